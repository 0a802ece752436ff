//! Target/delay table export command

use super::load_config;
use anyhow::Result;
use tinsel_bindings::{Binding, Category};
use tinsel_core::Named;

pub fn run(config: Option<&str>, category: &str, dump: bool) -> Result<()> {
    let config = load_config(config)?;
    let category: Category = category.parse()?;
    let binding = Binding::from_config(category, &config);
    let tables = binding.tables();

    println!("category:    {}", category.name());
    println!("entities:    {}", tables.len());
    println!("gather:      {}", binding.choreography().settings().gather_shape.name());
    println!("targets:     {}", tables.target_fingerprint().to_prefixed_hex());
    println!("all tables:  {}", tables.fingerprint().to_prefixed_hex());

    if dump {
        println!();
        println!("{:>6}  {:>10} {:>10} {:>10}  {:>6}", "index", "x", "y", "z", "delay");
        for (i, row) in tables.targets.iter().enumerate() {
            println!(
                "{:>6}  {:>10.4} {:>10.4} {:>10.4}  {:>6.4}",
                i, row[0], row[1], row[2], row[3]
            );
        }
    }

    Ok(())
}
