pub mod trove_utils;
