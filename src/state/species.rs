/// Static species metadata table
///
/// Keyed by the same label vocabulary the provider emits. The `non_mint`
/// entry doubles as the fallback for labels the table does not know.

/// Label of the universal fallback entry
pub const NON_MINT_LABEL: &str = "non_mint";

/// Descriptive content shown next to the top prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeciesMetadataEntry {
    pub label: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub uses: &'static str,
}

static SPECIES: [SpeciesMetadataEntry; 9] = [
    SpeciesMetadataEntry {
        label: "apple_mint",
        name: "Apple Mint (Mentha suaveolens)",
        description: "Apple mint has a fruity scent that is reminiscent of apples. It has round, woolly leaves and is used in teas, desserts, and as a garnish.",
        uses: "Teas, cocktails, salads, desserts, jellies",
    },
    SpeciesMetadataEntry {
        label: "aquatic_mint",
        name: "Aquatic Mint",
        description: "Aquatic mint grows in moist, wet areas and has strongly scented leaves. It's often found near water bodies.",
        uses: "Medicinal teas, aromatic gardens",
    },
    SpeciesMetadataEntry {
        label: "chocolate_mint",
        name: "Chocolate Mint (Mentha x piperita 'Chocolate')",
        description: "Chocolate mint has a distinct chocolate-mint aroma with dark stems and green leaves. It's a popular culinary herb.",
        uses: "Desserts, hot chocolate, ice cream, teas",
    },
    SpeciesMetadataEntry {
        label: "mexican_mint",
        name: "Mexican Mint (Plectranthus amboinicus)",
        description: "Mexican mint (also called Cuban oregano) has thick, fuzzy leaves with a strong oregano-like scent.",
        uses: "Mexican and Caribbean cooking, stews, bean dishes",
    },
    SpeciesMetadataEntry {
        label: "mojito_mint",
        name: "Mojito Mint (Mentha x villosa)",
        description: "Mojito mint is the traditional mint used in Cuban mojitos. It has a warm, aromatic flavor less intense than spearmint.",
        uses: "Mojito cocktails, Cuban cuisine, fruit salads",
    },
    SpeciesMetadataEntry {
        label: "peppermint",
        name: "Peppermint (Mentha × piperita)",
        description: "Peppermint has a strong, cool, menthol flavor with purple/green pointed leaves. It's one of the most common mint varieties.",
        uses: "Teas, desserts, candies, essential oils, digestive remedies",
    },
    SpeciesMetadataEntry {
        label: "pineapple_mint",
        name: "Pineapple Mint (Mentha suaveolens 'Variegata')",
        description: "Pineapple mint features variegated leaves with white edges and a fruity scent reminiscent of pineapple.",
        uses: "Fruit salads, garnishes, infused water, decorative gardens",
    },
    SpeciesMetadataEntry {
        label: "spearmint",
        name: "Spearmint (Mentha spicata)",
        description: "Spearmint has bright green pointed leaves with a sweet, mild flavor. It's the most common culinary mint variety.",
        uses: "Middle Eastern cuisine, teas, cocktails, jellies, sauces",
    },
    SpeciesMetadataEntry {
        label: NON_MINT_LABEL,
        name: "Not a Mint Leaf",
        description: "This doesn't appear to be a mint variety. While it might be another herb or plant, it lacks the distinctive characteristics of the mint family.",
        uses: "N/A",
    },
];

/// Find the entry for a class label, if the table has one
pub fn lookup(label: &str) -> Option<&'static SpeciesMetadataEntry> {
    SPECIES.iter().find(|entry| entry.label == label)
}

/// The `non_mint` entry
pub fn fallback() -> &'static SpeciesMetadataEntry {
    // Last slot is reserved for the sentinel
    &SPECIES[SPECIES.len() - 1]
}
