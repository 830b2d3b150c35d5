//! Belief-weighted payoffs and a Nash-equilibrium check for small games.
//!
//! Independent of the replicator simulation; nothing in the dynamics path
//! calls into this module.

use crate::error::{Error, Result};

/// `weights[player][other_player][strategy]`: how much weight `player` puts on
/// `other_player` choosing `strategy`.
#[derive(Debug, Clone, PartialEq)]
pub struct Beliefs {
    weights: Vec<Vec<Vec<f64>>>,
    strategies: usize,
}

impl Beliefs {
    pub fn new(weights: Vec<Vec<Vec<f64>>>) -> Result<Self> {
        let players = weights.len();
        if players == 0 {
            return Err(Error::invalid("beliefs", "at least one player is required"));
        }
        if let Some(player) = weights.iter().position(|row| row.len() != players) {
            return Err(Error::invalid(
                "beliefs",
                format!("player {player} must hold beliefs about all {players} players"),
            ));
        }

        let strategies = weights[0][0].len();
        if strategies == 0 {
            return Err(Error::invalid("beliefs", "at least one strategy is required"));
        }
        for distribution in weights.iter().flatten() {
            if distribution.len() != strategies {
                return Err(Error::invalid(
                    "beliefs",
                    format!(
                        "every belief must cover {strategies} strategies, found {}",
                        distribution.len()
                    ),
                ));
            }
            if distribution.iter().any(|w| !w.is_finite()) {
                return Err(Error::invalid("beliefs", "weights must be finite"));
            }
        }

        Ok(Beliefs {
            weights,
            strategies,
        })
    }

    pub fn players(&self) -> usize {
        self.weights.len()
    }

    pub fn strategies(&self) -> usize {
        self.strategies
    }

    fn weight(&self, player: usize, other_player: usize, strategy: usize) -> f64 {
        self.weights[player][other_player][strategy]
    }
}

/// Sum of the weights `player` assigns to the other players choosing the same
/// strategy index as `strategy`. `types` needs one entry per player.
pub fn calculate_payoff(
    player: usize,
    strategy: usize,
    types: &[usize],
    beliefs: &Beliefs,
) -> Result<f64> {
    if types.len() != beliefs.players() {
        return Err(Error::invalid(
            "types",
            format!(
                "expected {} entries, got {}",
                beliefs.players(),
                types.len()
            ),
        ));
    }
    if player >= beliefs.players() {
        return Err(Error::invalid(
            "player",
            format!("{player} out of range for {} players", beliefs.players()),
        ));
    }
    if strategy >= beliefs.strategies() {
        return Err(Error::invalid(
            "strategy",
            format!(
                "{strategy} out of range for {} strategies",
                beliefs.strategies()
            ),
        ));
    }

    let payoff = (0..beliefs.players())
        .filter(|&other_player| other_player != player)
        .flat_map(|other_player| {
            (0..beliefs.strategies())
                .filter(|&other_strategy| other_strategy == strategy)
                .map(move |other_strategy| beliefs.weight(player, other_player, other_strategy))
        })
        .sum();
    Ok(payoff)
}

/// True when no player can strictly improve by switching to another strategy.
pub fn is_nash_equilibrium(strategies: &[usize], beliefs: &Beliefs) -> Result<bool> {
    if strategies.len() != beliefs.players() {
        return Err(Error::invalid(
            "strategies",
            format!(
                "expected one strategy per player ({}), got {}",
                beliefs.players(),
                strategies.len()
            ),
        ));
    }

    let types: Vec<usize> = (0..beliefs.players()).collect();
    for (player, &strategy) in strategies.iter().enumerate() {
        let expected = calculate_payoff(player, strategy, &types, beliefs)?;
        for alternative in 0..beliefs.strategies() {
            if calculate_payoff(player, alternative, &types, beliefs)? > expected {
                return Ok(false);
            }
        }
    }
    Ok(true)
}
