/// Quiz definition models as handed over by the authoring collaborator.
pub mod models;
/// Quiz snapshot source abstraction and its in-memory implementation.
pub mod quiz_store;
/// Storage error types shared by quiz sources.
pub mod storage;
