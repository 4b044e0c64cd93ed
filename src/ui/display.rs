//! Banner and listings shown to the user

use console::Style;

use crate::catalog::{EmulatorVendor, SdkPackage};

const WIDTH: usize = 100;

fn border(c: char) -> String {
    c.to_string().repeat(WIDTH)
}

/// Boxed, centered signature printed at startup
pub fn banner_lines(signature: &str) -> Vec<String> {
    let inner = border('-');
    vec![
        format!("/{inner}\\"),
        format!("|{}|", Style::new().bold().apply_to(format!("{signature:^WIDTH$}"))),
        format!("\\{inner}/"),
    ]
}

pub fn print_banner(signature: &str) {
    println!();
    for line in banner_lines(signature) {
        println!("{line}");
    }
    println!();
}

/// Titled list of package ids
pub fn package_listing(title: &str, packages: &[SdkPackage]) -> Vec<String> {
    let mut lines = vec![
        border('-'),
        Style::new().bold().yellow().apply_to(title).to_string(),
        border('-'),
    ];
    lines.extend(packages.iter().map(|p| p.id.clone()));
    lines.push(String::new());
    lines
}

/// One table per vendor, vendors and products sorted
pub fn emulator_listing(vendors: &[EmulatorVendor]) -> Vec<String> {
    let header = Style::new().bold();
    let id_style = Style::new().cyan();

    let mut lines = Vec::new();
    for vendor in vendors {
        lines.push(border('='));
        lines.push(Style::new().bold().yellow().apply_to(&vendor.name).to_string());
        lines.push(border('='));
        lines.push(
            header
                .apply_to(format!(
                    "{:<20} {:<20} {:<12} {:<12}",
                    "[id]", "[name]", "[display]", "[resolution]"
                ))
                .to_string(),
        );
        lines.push(border('-'));
        for product in &vendor.products {
            lines.push(format!(
                "{} {:<20} {:<12} {:<12}",
                id_style.apply_to(format!("{:<20}", product.id)),
                product.name,
                product.display,
                product.resolution
            ));
        }
        lines.push(String::new());
    }
    lines
}
