mod bootstrap;
mod controller;
mod helpers;
mod http_backend;
mod poller;
mod settings;
mod store;
