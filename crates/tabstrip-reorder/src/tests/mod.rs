#![cfg(test)]

mod delegate;
mod group;
mod support;
mod utils;
