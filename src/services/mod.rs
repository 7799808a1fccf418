// Service layer: business logic behind each user interaction, kept out of
// the binary so the presentation layer stays a thin external collaborator.

pub mod dashboard;
pub mod requests;
pub mod tickets;
