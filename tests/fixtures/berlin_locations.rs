//! Prenzlauer Berg delivery addresses with approximate coordinates.

use courier_planner::traits::Coordinate;

#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(address: &'static str, lat: f64, lng: f64) -> Self {
        Self { address, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

pub const PRENZLAUER_BERG: &[Location] = &[
    Location::new("Schliemannstraße 34, 10437 Berlin", 52.5440, 13.4110),
    Location::new("Kastanienallee 82, 10435 Berlin", 52.5385, 13.4090),
    Location::new("Helmholtzplatz 1, 10437 Berlin", 52.5432, 13.4183),
    Location::new("Danziger Straße 136, 10407 Berlin", 52.5395, 13.4320),
    Location::new("Kollwitzstraße 1, 10405 Berlin", 52.5318, 13.4125),
    Location::new("Schönhauser Allee 6-7, 10119 Berlin", 52.5290, 13.4105),
    Location::new("Knaackstraße 97, 10435 Berlin", 52.5365, 13.4170),
    Location::new("Sredzkistraße 44, 10435 Berlin", 52.5380, 13.4195),
    Location::new("Stargarder Straße 73, 10437 Berlin", 52.5475, 13.4190),
    Location::new("Oderberger Straße 56, 10435 Berlin", 52.5390, 13.4035),
    Location::new("Kopenhagener Straße 71, 10437 Berlin", 52.5500, 13.4100),
    Location::new("Pappelallee 29, 10437 Berlin", 52.5447, 13.4167),
    Location::new("Winsstraße 65, 10405 Berlin", 52.5330, 13.4250),
    Location::new("Dunckerstraße 14, 10437 Berlin", 52.5420, 13.4230),
    Location::new("Senefelderstraße 22, 10437 Berlin", 52.5452, 13.4215),
    Location::new("Husemannstraße 32, 10435 Berlin", 52.5370, 13.4155),
    Location::new("Belforter Straße 21, 10405 Berlin", 52.5340, 13.4180),
    Location::new("Greifenhagener Straße 65, 10437 Berlin", 52.5495, 13.4160),
    Location::new("Greifswalder Straße 212, 10405 Berlin", 52.5300, 13.4290),
    Location::new("Bornholmer Straße 72, 10439 Berlin", 52.5545, 13.4030),
];
