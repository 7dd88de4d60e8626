pub mod rock_paper_scissors;
