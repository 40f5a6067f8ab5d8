// Static word banks, graded by difficulty. Level mode exhausts these pools
// per run (easy -> medium -> hard); practice draws from one bank only and
// tournament mixes all three by fixed weights.

pub const EASY_WORDS: &[&str] = &[
    "cat", "dog", "sun", "run", "fun", "hat", "map", "pen", "cup", "box",
    "key", "red", "sky", "tree", "fish", "bird", "rain", "snow", "wind", "star",
    "moon", "book", "door", "hand", "foot", "milk", "cake", "ship", "road", "fire",
    "gold", "king", "song", "jump", "walk", "talk", "play", "read", "time", "home",
];

pub const MEDIUM_WORDS: &[&str] = &[
    "planet", "garden", "window", "basket", "bridge", "camera", "dragon", "engine",
    "forest", "guitar", "harbor", "island", "jungle", "kitchen", "ladder", "market",
    "meadow", "mirror", "needle", "orange", "pencil", "pirate", "rocket", "saddle",
    "sunset", "temple", "thunder", "tunnel", "valley", "violet", "wizard", "yellow",
    "anchor", "breeze", "candle", "castle", "desert", "falcon", "glacier", "lantern",
];

pub const HARD_WORDS: &[&str] = &[
    "adventure", "atmosphere", "beautiful", "boulevard", "celebration", "challenge",
    "dangerous", "discovery", "education", "fantastic", "generation", "happiness",
    "important", "journalist", "knowledge", "laboratory", "lighthouse", "magnificent",
    "navigation", "opportunity", "passionate", "playground", "restaurant", "spectacular",
    "technology", "tournament", "understand", "vocabulary", "wonderful", "xylophone",
];
