pub mod file_controller;
