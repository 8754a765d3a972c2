pub mod markdown_loader;
