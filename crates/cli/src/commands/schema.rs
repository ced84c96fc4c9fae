//! `querywright schema`: Print the schema context sent ahead of every prompt.

use querywright_translator::SchemaDescriptor;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let descriptor = SchemaDescriptor::builtin();
    eprintln!(
        "schema {} ({} queries, {} mutations)",
        descriptor.version,
        descriptor.queries().count(),
        descriptor.mutations().count()
    );
    println!("{}", SchemaDescriptor::context_text());
    Ok(())
}
