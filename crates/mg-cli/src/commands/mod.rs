//! CLI command implementations

pub(crate) mod history;
pub(crate) mod mark;
pub(crate) mod migrate;
pub(crate) mod status;

#[cfg(test)]
pub(crate) mod test_project;
