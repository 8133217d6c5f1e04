pub(crate) mod audio;
pub(crate) mod list;
pub(crate) mod study;
