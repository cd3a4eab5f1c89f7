mod common;
mod prediction;
mod scoring;
