//! Fixed enumerations the simulated scraper samples from.

pub struct AirlineSource {
    pub name: &'static str,
    pub carrier_code: &'static str,
    pub website: &'static str,
}

pub struct CruiseLineSource {
    pub name: &'static str,
    pub ships: &'static [&'static str],
    pub website: &'static str,
}

pub const AIRLINES: &[AirlineSource] = &[
    AirlineSource { name: "United Airlines", carrier_code: "UA", website: "www.united.com" },
    AirlineSource { name: "American Airlines", carrier_code: "AA", website: "www.aa.com" },
    AirlineSource { name: "Delta", carrier_code: "DL", website: "www.delta.com" },
    AirlineSource { name: "British Airways", carrier_code: "BA", website: "www.britishairways.com" },
    AirlineSource { name: "Emirates", carrier_code: "EK", website: "www.emirates.com" },
    AirlineSource { name: "Lufthansa", carrier_code: "LH", website: "www.lufthansa.com" },
    AirlineSource { name: "Air France", carrier_code: "AF", website: "www.airfrance.com" },
    AirlineSource { name: "Qatar Airways", carrier_code: "QR", website: "www.qatarairways.com" },
    AirlineSource { name: "Singapore Airlines", carrier_code: "SQ", website: "www.singaporeair.com" },
    AirlineSource { name: "LATAM Airlines", carrier_code: "LA", website: "www.latamairlines.com" },
];

pub const CRUISE_LINES: &[CruiseLineSource] = &[
    CruiseLineSource {
        name: "Royal Caribbean",
        ships: &["Oasis of the Seas", "Symphony of the Seas", "Wonder of the Seas"],
        website: "www.royalcaribbean.com",
    },
    CruiseLineSource {
        name: "Carnival Cruise Line",
        ships: &["Mardi Gras", "Carnival Celebration", "Carnival Horizon"],
        website: "www.carnival.com",
    },
    CruiseLineSource {
        name: "Norwegian Cruise Line",
        ships: &["Norwegian Prima", "Norwegian Encore", "Norwegian Bliss"],
        website: "www.ncl.com",
    },
    CruiseLineSource {
        name: "MSC Cruises",
        ships: &["MSC World Europa", "MSC Seashore", "MSC Grandiosa"],
        website: "www.msccruises.com",
    },
    CruiseLineSource {
        name: "Princess Cruises",
        ships: &["Sun Princess", "Discovery Princess", "Enchanted Princess"],
        website: "www.princess.com",
    },
    CruiseLineSource {
        name: "Celebrity Cruises",
        ships: &["Celebrity Beyond", "Celebrity Apex", "Celebrity Edge"],
        website: "www.celebritycruises.com",
    },
    CruiseLineSource {
        name: "Holland America Line",
        ships: &["Rotterdam", "Nieuw Statendam", "Koningsdam"],
        website: "www.hollandamerica.com",
    },
    CruiseLineSource {
        name: "Costa Cruises",
        ships: &["Costa Smeralda", "Costa Toscana", "Costa Firenze"],
        website: "www.costacruises.com",
    },
    CruiseLineSource {
        name: "Disney Cruise Line",
        ships: &["Disney Wish", "Disney Fantasy", "Disney Dream"],
        website: "disneycruise.disney.go.com",
    },
    CruiseLineSource {
        name: "Viking Ocean Cruises",
        ships: &["Viking Mars", "Viking Venus", "Viking Orion"],
        website: "www.vikingcruises.com",
    },
];

pub const AIRPORTS: &[&str] = &["JFK", "LAX", "LHR", "CDG", "DXB", "NRT", "SYD", "GRU", "MAD", "BCN"];

pub const DEPARTURE_PORTS: &[&str] = &["Miami", "Barcelona", "Venice", "Singapore", "Southampton"];

pub const CABIN_TYPES: &[&str] = &["Interior", "Ocean View", "Balcony", "Suite"];

pub const CRUISE_NIGHTS: &[i32] = &[3, 5, 7, 10, 14];

/// `"United Airlines"` -> `"united_airlines"`
pub fn source_slug(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

pub fn airline_names() -> Vec<String> {
    AIRLINES.iter().map(|a| a.name.to_string()).collect()
}

pub fn cruise_line_names() -> Vec<String> {
    CRUISE_LINES.iter().map(|c| c.name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_slug() {
        assert_eq!(source_slug("United Airlines"), "united_airlines");
        assert_eq!(source_slug("MSC Cruises"), "msc_cruises");
    }

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(AIRLINES.len(), 10);
        assert_eq!(CRUISE_LINES.len(), 10);
        assert!(CRUISE_LINES.iter().all(|c| !c.ships.is_empty()));
        assert!(AIRLINES.iter().all(|a| a.carrier_code.len() == 2));
    }
}
