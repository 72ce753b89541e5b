#[derive(thiserror::Error, Debug)]
pub enum CrudError {
    #[error("collection {collection} has no row with id {id}")]
    RowNotFound { collection: &'static str, id: i64 },
    #[error("{0}")]
    Backend(String),
}
