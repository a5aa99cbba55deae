//! Static catalog of NVMe/SSD vendors and the product names they ship.
//!
//! Order matters: identity selection indexes into this list, so entries must
//! only ever be appended.

#[derive(Debug, Clone, Copy)]
pub struct VendorEntry {
    pub vendor: &'static str,
    pub models: &'static [&'static str],
}

pub static SSD_CATALOG: &[VendorEntry] = &[
    VendorEntry {
        vendor: "Samsung",
        models: &[
            "XS1715", "SM1715", "PM953", "PM963", "PM971", "PM981", "PM981a", "PM991",
            "PM991a", "PM9A1", "PM9C1a", "PM1725", "PM1725a", "PM1725b", "PM1731a",
            "PM1733", "PM1735", "PM1743", "PM9A3", "PM983", "Samsung 983 DCT",
            "Samsung 983 ZET",
        ],
    },
    VendorEntry {
        vendor: "Western Digital",
        models: &[
            "PC SN520", "PC SN720", "PC SN730", "PC SN735", "PC SN740", "WD Red SN700",
            "WD Gold SN600", "Ultrastar SN100", "Ultrastar SN150", "Ultrastar SN200",
            "Ultrastar DC SN620", "Ultrastar DC SN630", "Ultrastar DC SN640",
            "Ultrastar DC SN840", "Ultrastar DC SN340",
        ],
    },
    VendorEntry {
        vendor: "Intel",
        models: &[
            "SSD 750", "SSD DC P3500", "SSD DC P3600", "SSD DC P3700", "SSD DC P3520",
            "SSD DC P3608", "SSD DC P4500", "SSD DC P4501", "SSD DC P4510", "SSD DC P4600",
            "SSD DC P4608", "SSD DC P4610", "Optane SSD DC P4800X", "Optane SSD DC D4800X",
            "Optane SSD P5800X", "Optane SSD 900P", "Optane SSD 905P", "Optane SSD 800P",
            "Optane Memory H10", "Optane Memory H20", "Optane SSD P1600X", "SSD D5-P4326",
            "SSD D5-P5316", "SSD D7-P5500", "SSD D7-P5510", "SSD D7-P5600", "SSD 600p",
            "SSD 660p", "SSD 665p", "SSD 670p", "SSD 760p", "SSD Pro 7600p",
        ],
    },
    VendorEntry {
        vendor: "Micron",
        models: &[
            "Micron 7100", "Micron 9100", "Micron 9200", "Micron 9300", "Micron 9400",
            "Micron 7300", "Micron 7400", "Micron 2200", "Micron 2300", "Micron 2210",
            "Micron 2400", "Micron 3400", "Micron X100",
        ],
    },
    VendorEntry {
        vendor: "Crucial",
        models: &[
            "Crucial P1", "Crucial P2", "Crucial P3", "Crucial P3 Plus", "Crucial P5",
            "Crucial P5 Plus",
        ],
    },
    VendorEntry {
        vendor: "Kioxia",
        models: &[
            "XG3", "XG4", "XG5", "XG5-P", "XG6", "XG6-P", "XG7", "BG3", "BG4", "BG5", "BG6",
            "CD5", "CD6", "CD7", "CM5", "CM6", "CM7", "XD5", "XD6", "XD7P", "Kioxia FL6",
            "OCZ Z-Drive 6000", "OCZ Z-Drive 6300", "OCZ RD400",
        ],
    },
    VendorEntry {
        vendor: "Seagate",
        models: &[
            "Nytro 5000", "Nytro 5350", "Nytro 5550", "IronWolf 510", "IronWolf 525",
            "BarraCuda 510", "BarraCuda Q5",
        ],
    },
    VendorEntry {
        vendor: "Kingston",
        models: &[
            "DC1000B", "DC1000M", "DC1500M", "DCP1000", "KC1000", "KC2000", "KC2500",
            "KC3000", "A1000", "A2000", "NV1", "NV2",
        ],
    },
    VendorEntry {
        vendor: "SK hynix",
        models: &[
            "Gold P31", "Platinum P41", "BC501", "BC511", "BC711", "PC401", "PE6010",
            "PE6030", "PE8010", "PE8030", "PE9010", "PE9030", "PE9110",
        ],
    },
    VendorEntry {
        vendor: "Solidigm",
        models: &[
            "P41 Plus", "P44 Pro", "D7-P5520", "D7-P5620", "D5-P5336",
        ],
    },
];
