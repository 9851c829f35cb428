pub mod books;
pub mod dashboard;
pub mod issued_books;
pub mod profile;
pub mod students;
