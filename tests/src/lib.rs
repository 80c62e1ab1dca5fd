#[cfg(test)]
mod tests;
#[cfg(test)]
mod utils;
