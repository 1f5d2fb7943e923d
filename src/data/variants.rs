// Cushion variant table.
// Ids are dense from 0 so `id % 4` spreads evenly over the four activation sounds.
use super::Variant;

pub static VARIANTS: [Variant; 6] = [
    Variant { id: 0, name: "The Thundercloud", description: "A rumbling storm of divine flatulence", color: "#4a6da7", theme: "thunder", score_value: 1 },
    Variant { id: 1, name: "The Royal Roar", description: "Fit for the throne of the gods", color: "#8e2de2", theme: "royal", score_value: 2 },
    Variant { id: 2, name: "The Crimson Calamity", description: "A blazing inferno of intestinal fury", color: "#e94822", theme: "crimson", score_value: 3 },
    Variant { id: 3, name: "The Emerald Eruption", description: "A verdant explosion of mythic proportions", color: "#1eb980", theme: "emerald", score_value: 2 },
    Variant { id: 4, name: "The Golden Gale", description: "A windstorm of legendary opulence", color: "#ffcb47", theme: "golden", score_value: 4 },
    Variant { id: 5, name: "The Obsidian Outburst", description: "The dark whispers of the underworld", color: "#212121", theme: "obsidian", score_value: 5 },
];
