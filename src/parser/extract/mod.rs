pub mod absentees;
pub mod agenda;
pub mod metadata;
pub mod speakers;
