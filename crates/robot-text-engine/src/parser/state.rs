//! Where the parser is in the table grammar.
//!
//! States are kept on a stack so that the context of a logical row can be
//! saved at the end of a line and restored when a `...` continuation line
//! picks the row up again.

use crate::model::{HolderKind, LocalSettingKind, SettingKind, TableKind, ValueRole, VariableKind};

/// Whether an executable row has seen its action yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPhase {
    /// Only assignment targets so far.
    Assignments,
    /// The action has been seen; everything else is an argument.
    Arguments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsingState {
    OutsideTable,
    /// Inside a Comments or user-defined table.
    Trash,
    /// Rest of a header line.
    TableHeader(TableKind),
    TableInside(TableKind),
    /// After a suite setting declaration; carries the role of the last value.
    Setting(SettingKind, Option<ValueRole>),
    Variable(VariableKind),
    /// Inside the body of a test case, task or keyword.
    Holder(HolderKind),
    LocalSetting(HolderKind, LocalSettingKind, Option<ValueRole>),
    ExecutableRow(HolderKind, RowPhase),
}

impl ParsingState {
    /// States that only live until the end of their logical row.
    fn is_row_state(self) -> bool {
        matches!(
            self,
            ParsingState::Setting(..)
                | ParsingState::Variable(_)
                | ParsingState::LocalSetting(..)
                | ParsingState::ExecutableRow(..)
        )
    }

    /// Same state after a value of `role` was mapped.
    pub fn after_value(self, role: ValueRole) -> Self {
        match self {
            ParsingState::Setting(kind, _) => ParsingState::Setting(kind, Some(role)),
            ParsingState::LocalSetting(holder, kind, _) => {
                ParsingState::LocalSetting(holder, kind, Some(role))
            }
            other => other,
        }
    }

    /// Role of the previous value, for states that track one.
    pub fn last_role(self) -> Option<ValueRole> {
        match self {
            ParsingState::Setting(_, role) | ParsingState::LocalSetting(_, _, role) => role,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsingStack {
    states: Vec<ParsingState>,
}

impl Default for ParsingStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ParsingStack {
    pub fn new() -> Self {
        Self {
            states: vec![ParsingState::OutsideTable],
        }
    }

    pub fn current(&self) -> ParsingState {
        self.states
            .last()
            .copied()
            .unwrap_or(ParsingState::OutsideTable)
    }

    pub fn states(&self) -> &[ParsingState] {
        &self.states
    }

    pub fn push(&mut self, state: ParsingState) {
        if self.states.last() != Some(&state) {
            self.states.push(state);
        }
    }

    pub fn pop(&mut self) -> Option<ParsingState> {
        if self.states.len() > 1 {
            self.states.pop()
        } else {
            None
        }
    }

    /// Drop everything back to [`ParsingState::OutsideTable`].
    pub fn close_table(&mut self) {
        self.states.clear();
        self.states.push(ParsingState::OutsideTable);
    }

    /// Close whatever is open and enter a new table (or trash for Comments
    /// and user tables).
    pub fn open_table(&mut self, kind: Option<TableKind>) {
        self.close_table();
        match kind {
            Some(TableKind::Comments) | None => self.states.push(ParsingState::Trash),
            Some(kind) => self.states.push(ParsingState::TableHeader(kind)),
        }
    }

    /// A new physical line that does not continue the previous one: row
    /// states end, a header line's context becomes the table body, and an
    /// open holder stays open.
    pub fn start_line(&mut self) {
        while let Some(&top) = self.states.last() {
            match top {
                state if state.is_row_state() => {
                    self.states.pop();
                }
                ParsingState::TableHeader(kind) => {
                    self.states.pop();
                    self.states.push(ParsingState::TableInside(kind));
                    break;
                }
                _ => break,
            }
        }
    }

    /// Pop back to the table body, closing any holder.
    pub fn pop_to_table(&mut self) {
        while self.states.len() > 1
            && !matches!(self.current(), ParsingState::TableInside(_) | ParsingState::Trash)
        {
            self.states.pop();
        }
    }

    /// Table the stack is inside, if any.
    pub fn table(&self) -> Option<TableKind> {
        self.states.iter().rev().find_map(|state| match state {
            ParsingState::TableHeader(kind) | ParsingState::TableInside(kind) => Some(*kind),
            _ => None,
        })
    }

    pub fn holder(&self) -> Option<HolderKind> {
        self.states.iter().rev().find_map(|state| match state {
            ParsingState::Holder(kind) => Some(*kind),
            _ => None,
        })
    }
}
