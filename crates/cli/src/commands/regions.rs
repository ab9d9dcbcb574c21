//! Fiscal region listing.

use facturo_core::regions;

/// Print every fiscal region with its identifier fields.
#[allow(clippy::print_stdout)]
pub fn run() {
    for region in regions() {
        println!("{} - {}", region.region.code(), region.name);
        for field in region.fields {
            println!("  {:<10} {} [{}]", field.key(), field.label, field.placeholder);
        }
    }
}
