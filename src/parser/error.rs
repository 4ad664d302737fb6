use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ShapeError {
    #[error("page payload has no `jobDetails` list (found {found})")]
    MissingJobList { found: &'static str },
}
