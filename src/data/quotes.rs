// Divine quote table. Themes line up with variant themes except "chaos" and "wisdom",
// which are only reachable through unfiltered picks.
use super::Quote;

pub static QUOTES: [Quote; 8] = [
    Quote { deity: "Zeus", quote: "My thunderous expulsions shake the heavens themselves!", theme: "thunder" },
    Quote { deity: "Odin", quote: "By my throne in Asgard, what a magnificent release!", theme: "royal" },
    Quote { deity: "Pele", quote: "My volcanic emissions flow like lava through the divine realm!", theme: "crimson" },
    Quote { deity: "Pan", quote: "The forest spirits dance when I release my sylvan zephyrs!", theme: "emerald" },
    Quote { deity: "Midas", quote: "Even my gaseous emissions turn to gold in their opulence!", theme: "golden" },
    Quote { deity: "Hades", quote: "From the depths of the underworld comes this miasmic greeting!", theme: "obsidian" },
    Quote { deity: "Eris", quote: "Chaos is my domain, and chaos I shall release!", theme: "chaos" },
    Quote { deity: "Athena", quote: "Even wisdom acknowledges the necessity of release!", theme: "wisdom" },
];
