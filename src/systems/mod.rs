pub mod city;
pub mod interaction;
pub mod overlay;
pub mod ui;
