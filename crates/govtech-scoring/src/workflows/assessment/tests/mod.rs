mod common;
mod validation;
mod wizard;
