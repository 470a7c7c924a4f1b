pub mod test_history;
