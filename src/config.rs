#[derive(Debug, Clone)]
pub struct Config {
    /// Log every token, cursor and nesting stack at `trace` level.
    pub trace: bool,
    /// Rewrite `\d \D \w \W \s \S ? * +` into their bracket forms before
    /// interpreting them. When off they stay opaque literals: a quantified
    /// `\d` becomes a set with no known members.
    pub expand_shorthand: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            trace: false,
            expand_shorthand: true,
        }
    }
}

impl Config {
    pub fn traced() -> Self {
        Config {
            trace: true,
            ..Config::default()
        }
    }
}
