// Application layer: request envelope shared by the CLI and the Lambda entry point.

pub mod handler;
