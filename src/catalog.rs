//! Built-in delivery addresses in Berlin Prenzlauer Berg.

pub const DEFAULT_COURIERS: u32 = 2;

pub const ADDRESS_CHOICES: [&str; 20] = [
    "Schliemannstraße 34, 10437 Berlin",
    "Kastanienallee 82, 10435 Berlin",
    "Helmholtzplatz 1, 10437 Berlin",
    "Danziger Straße 136, 10407 Berlin",
    "Kollwitzstraße 1, 10405 Berlin",
    "Schönhauser Allee 6-7, 10119 Berlin",
    "Knaackstraße 97, 10435 Berlin",
    "Sredzkistraße 44, 10435 Berlin",
    "Stargarder Straße 73, 10437 Berlin",
    "Oderberger Straße 56, 10435 Berlin",
    "Kopenhagener Straße 71, 10437 Berlin",
    "Pappelallee 29, 10437 Berlin",
    "Winsstraße 65, 10405 Berlin",
    "Dunckerstraße 14, 10437 Berlin",
    "Senefelderstraße 22, 10437 Berlin",
    "Husemannstraße 32, 10435 Berlin",
    "Belforter Straße 21, 10405 Berlin",
    "Greifenhagener Straße 65, 10437 Berlin",
    "Greifswalder Straße 212, 10405 Berlin",
    "Bornholmer Straße 72, 10439 Berlin",
];

/// The first eight choices.
pub fn default_addresses() -> Vec<String> {
    ADDRESS_CHOICES[..8].iter().map(|address| address.to_string()).collect()
}
