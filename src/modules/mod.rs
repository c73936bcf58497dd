pub mod import_step;
