//! `thoughtloop tools`: list the built-in tools.

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let registry = thoughtloop_tools::default_registry();

    println!("Built-in tools ({}):", registry.len());
    for (name, description) in registry.descriptions() {
        println!("  {name:<16} {description}");
    }
    Ok(())
}
