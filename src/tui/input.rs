//! Key bindings.

use crossterm::event::KeyCode;
use strictly_hanoi::Peg;

/// What a key press asks the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// First or second half of a two-step move.
    SelectPeg(Peg),
    /// Start a game, restacking after a finished one.
    Start,
    /// Pause or resume.
    TogglePause,
    /// Replay the optimal solution.
    ShowSolution,
    /// Stop the solution being shown.
    CancelSolution,
    /// Back to idle.
    Reset,
    /// One more disk.
    MoreDisks,
    /// One fewer disk.
    FewerDisks,
    /// Leave the program.
    Quit,
}

/// Maps a key to its command.
pub fn command_for(key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::Char('1') => Some(Command::SelectPeg(Peg::Left)),
        KeyCode::Char('2') => Some(Command::SelectPeg(Peg::Middle)),
        KeyCode::Char('3') => Some(Command::SelectPeg(Peg::Right)),
        KeyCode::Enter => Some(Command::Start),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(Command::TogglePause),
        KeyCode::Char('s') => Some(Command::ShowSolution),
        KeyCode::Char('c') | KeyCode::Esc => Some(Command::CancelSolution),
        KeyCode::Char('r') => Some(Command::Reset),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => Some(Command::MoreDisks),
        KeyCode::Char('-') | KeyCode::Down => Some(Command::FewerDisks),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_select_pegs() {
        assert_eq!(
            command_for(KeyCode::Char('1')),
            Some(Command::SelectPeg(Peg::Left))
        );
        assert_eq!(
            command_for(KeyCode::Char('3')),
            Some(Command::SelectPeg(Peg::Right))
        );
        assert_eq!(command_for(KeyCode::Char('4')), None);
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(command_for(KeyCode::Enter), Some(Command::Start));
        assert_eq!(command_for(KeyCode::Esc), Some(Command::CancelSolution));
        assert_eq!(command_for(KeyCode::Char('q')), Some(Command::Quit));
        assert_eq!(command_for(KeyCode::Char('x')), None);
    }
}
