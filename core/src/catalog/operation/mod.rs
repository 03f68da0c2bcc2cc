pub mod create_thumbnail;

#[cfg(test)]
mod test;
