pub mod health;
pub mod nextdate;
pub mod signin;
pub mod tasks;
