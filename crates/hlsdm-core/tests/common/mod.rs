#![allow(dead_code)]

pub mod playlist_server;
