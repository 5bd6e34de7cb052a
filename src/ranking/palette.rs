use rand::seq::IndexedRandom;

use super::models::Player;

/// Fixed palette offered to players
pub const PALETTE: [&str; 25] = [
    "#3498db", "#e74c3c", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c", "#d35400", "#34495e",
    "#e67e22", "#E4F250", "#2980b9", "#8e44ad", "#c0392b", "#16a085", "#f1c40f", "#7f8c8d",
    "#2c3e50", "#e84393", "#6c5ce7", "#00b894", "#e17055", "#0984e3", "#fd79a8", "#a29bfe",
    "#08EF01",
];

/// Color used when a stored player carries none
pub const DEFAULT_COLOR: &str = "#3498db";

pub fn is_palette_color(color: &str) -> bool {
    PALETTE.iter().any(|c| c.eq_ignore_ascii_case(color))
}

/// Picks a random palette color not used by any active player, or any palette
/// color once all of them are taken.
pub fn pick_unique_color(players: &[Player]) -> &'static str {
    let mut rng = rand::rng();
    let available: Vec<&'static str> = PALETTE
        .iter()
        .copied()
        .filter(|color| !players.iter().any(|p| p.color.eq_ignore_ascii_case(color)))
        .collect();

    available
        .choose(&mut rng)
        .or_else(|| PALETTE.choose(&mut rng))
        .copied()
        .unwrap_or(DEFAULT_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_only_free_color() {
        let players: Vec<Player> = PALETTE
            .iter()
            .skip(1)
            .enumerate()
            .map(|(i, color)| Player::new(i as u32 + 1, format!("P{}", i), *color))
            .collect();

        assert_eq!(pick_unique_color(&players), PALETTE[0]);
    }

    #[test]
    fn falls_back_to_palette_when_exhausted() {
        let players: Vec<Player> = PALETTE
            .iter()
            .enumerate()
            .map(|(i, color)| Player::new(i as u32 + 1, format!("P{}", i), *color))
            .collect();

        assert!(is_palette_color(pick_unique_color(&players)));
    }
}
