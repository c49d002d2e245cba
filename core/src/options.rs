use alloc::{boxed::Box, format, string::String, vec::Vec};
use core::fmt;
use core::ops::Deref;
use serde::{Deserialize, Serialize};

use crate::*;

/// Length required for `number_class` and `number_text`, one entry per possible adjacent-mine count.
pub const NUMBER_VARIANTS: usize = 9;

/// User facing configuration, every field falls back to its default when missing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameOptions {
    /// Prefix of the persistence keys, `{key}Board` and `{key}Status`.
    pub key: String,
    pub width: Coord,
    pub height: Coord,
    pub mine_probability: f64,
    pub block_class: String,
    pub block_text: String,
    pub number_class: Vec<String>,
    pub number_text: Vec<String>,
    pub boom_class: String,
    pub boom_text: String,
    pub flag_class: String,
    pub flag_text: String,
    /// Seed for mine placement, taken from the clock when absent.
    pub seed: Option<u64>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            key: "minesweeper".into(),
            width: 8,
            height: 8,
            mine_probability: 0.2,
            block_class: "w-8 h-8 border border-gray-600/100 hover:bg-gray-500".into(),
            block_text: "❓".into(),
            number_class: [
                "bg-gray-500/30",
                "bg-blue-500/30",
                "bg-green-500/30",
                "bg-red-500/30",
                "bg-purple-500/30",
                "bg-orange-500/30",
                "bg-yellow-500/30",
                "bg-pink-500/30",
                "bg-teal-500/30",
            ]
            .map(String::from)
            .into(),
            number_text: ["0️⃣", "1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣"]
                .map(String::from)
                .into(),
            boom_class: "bg-red-900/30".into(),
            boom_text: "💥".into(),
            flag_class: "bg-lime-500/30".into(),
            flag_text: "🚩".into(),
            seed: None,
        }
    }
}

impl GameOptions {
    /// Parses a possibly partial JSON object, missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| OptionsError::Malformed(format!("{err}")))
    }

    pub fn validate(&self) -> Result<()> {
        if self.width < 1 {
            return Err(OptionsError::Width);
        }
        if self.height < 1 {
            return Err(OptionsError::Height);
        }
        // also rejects NaN
        if !(self.mine_probability > 0.0 && self.mine_probability < 1.0) {
            return Err(OptionsError::MineProbability(self.mine_probability));
        }
        if self.number_class.len() != NUMBER_VARIANTS {
            return Err(OptionsError::NumberClassLength(self.number_class.len()));
        }
        if self.number_text.len() != NUMBER_VARIANTS {
            return Err(OptionsError::NumberTextLength(self.number_text.len()));
        }
        Ok(())
    }

    pub fn validated(self) -> Result<ValidOptions> {
        self.validate()?;
        Ok(ValidOptions(self))
    }
}

/// Options that passed validation, the only form the engine accepts.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidOptions(GameOptions);

impl ValidOptions {
    pub const fn size(&self) -> Coord2 {
        (self.0.width, self.0.height)
    }

    pub fn board_key(&self) -> String {
        format!("{}Board", self.0.key)
    }

    pub fn status_key(&self) -> String {
        format!("{}Status", self.0.key)
    }

    pub fn seed(&self) -> u64 {
        self.0.seed.unwrap_or_else(clock_seed)
    }

    pub(crate) fn unrevealed_block(&self) -> Block {
        Block::new(self.0.block_text.clone(), self.0.block_class.clone())
    }

    pub(crate) fn number_presentation(&self, adjacent_mines: u8) -> (String, String) {
        let index = usize::from(adjacent_mines).min(NUMBER_VARIANTS - 1);
        (
            self.0.number_text[index].clone(),
            format!("{} {}", self.0.block_class, self.0.number_class[index]),
        )
    }

    pub(crate) fn boom_presentation(&self) -> (String, String) {
        (
            self.0.boom_text.clone(),
            format!("{} {}", self.0.block_class, self.0.boom_class),
        )
    }

    pub(crate) fn flag_presentation(&self) -> (String, String) {
        (
            self.0.flag_text.clone(),
            format!("{} {}", self.0.block_class, self.0.flag_class),
        )
    }

    pub(crate) fn unrevealed_presentation(&self) -> (String, String) {
        (self.0.block_text.clone(), self.0.block_class.clone())
    }
}

impl Deref for ValidOptions {
    type Target = GameOptions;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<GameOptions> for ValidOptions {
    type Error = OptionsError;

    fn try_from(options: GameOptions) -> Result<Self> {
        options.validated()
    }
}

fn clock_seed() -> u64 {
    use web_time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        // keeps the low 64 bits, plenty for a seed
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

type Hook = Box<dyn FnMut()>;

/// Callbacks fired once on the transition into a terminal state.
pub struct GameHooks {
    on_lost: Hook,
    on_won: Hook,
}

impl GameHooks {
    pub fn new(on_lost: impl FnMut() + 'static, on_won: impl FnMut() + 'static) -> Self {
        Self {
            on_lost: Box::new(on_lost),
            on_won: Box::new(on_won),
        }
    }

    pub fn with_on_lost(mut self, on_lost: impl FnMut() + 'static) -> Self {
        self.on_lost = Box::new(on_lost);
        self
    }

    pub fn with_on_won(mut self, on_won: impl FnMut() + 'static) -> Self {
        self.on_won = Box::new(on_won);
        self
    }

    pub(crate) fn lost(&mut self) {
        (self.on_lost)()
    }

    pub(crate) fn won(&mut self) {
        (self.on_won)()
    }
}

impl Default for GameHooks {
    fn default() -> Self {
        Self::new(
            || log::info!("Game Over 🔚"),
            || log::info!("You Won 🎉"),
        )
    }
}

impl fmt::Debug for GameHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameHooks").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn defaults_are_valid() {
        let options = GameOptions::default().validated().unwrap();

        assert_eq!(options.size(), (8, 8));
        assert_eq!(options.board_key(), "minesweeperBoard");
        assert_eq!(options.status_key(), "minesweeperStatus");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let options = GameOptions::from_json(r#"{"width": 16, "mineProbability": 0.1}"#).unwrap();

        assert_eq!(options.width, 16);
        assert_eq!(options.height, 8);
        assert_eq!(options.mine_probability, 0.1);
        assert_eq!(options.key, "minesweeper");
        assert_eq!(options.number_text.len(), NUMBER_VARIANTS);
    }

    #[test]
    fn negative_width_is_malformed() {
        let err = GameOptions::from_json(r#"{"width": -1}"#).unwrap_err();

        assert!(matches!(err, OptionsError::Malformed(_)));
        assert_eq!(err.field(), None);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let width = GameOptions {
            width: 0,
            ..Default::default()
        };
        let height = GameOptions {
            height: 0,
            ..Default::default()
        };

        assert_eq!(width.validate(), Err(OptionsError::Width));
        assert_eq!(height.validate(), Err(OptionsError::Height));
        assert_eq!(OptionsError::Height.field(), Some("height"));
    }

    #[test]
    fn probability_must_be_inside_open_interval() {
        for probability in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let options = GameOptions {
                mine_probability: probability,
                ..Default::default()
            };
            let err = options.validate().unwrap_err();
            assert_eq!(err.field(), Some("mineProbability"));
        }
    }

    #[test]
    fn presentation_arrays_need_nine_entries() {
        let short_class = GameOptions {
            number_class: vec!["a".into(); 8],
            ..Default::default()
        };
        let long_text = GameOptions {
            number_text: vec!["a".into(); 10],
            ..Default::default()
        };

        assert_eq!(short_class.validate(), Err(OptionsError::NumberClassLength(8)));
        assert_eq!(long_text.validate(), Err(OptionsError::NumberTextLength(10)));
    }

    #[test]
    fn number_presentation_combines_block_class() {
        let options = GameOptions::default().validated().unwrap();
        let (text, class) = options.number_presentation(2);

        assert_eq!(text, "2️⃣");
        assert_eq!(
            class,
            "w-8 h-8 border border-gray-600/100 hover:bg-gray-500 bg-green-500/30"
        );
    }

    #[test]
    fn explicit_seed_is_kept() {
        let options = GameOptions {
            seed: Some(42),
            ..Default::default()
        }
        .validated()
        .unwrap();

        assert_eq!(options.seed(), 42);
    }
}
