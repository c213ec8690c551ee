mod driver;
mod service;
