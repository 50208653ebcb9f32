mod ordering;
mod utils;
