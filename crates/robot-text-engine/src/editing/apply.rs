use super::{Cmd, EditError, ElementOwner, ModelEvent, Patch};
use crate::model::{
    ElementId, ElementKind, ElementPath, ExecutableHolder, ModelElement, RobotFile, TableKind,
    ValueRole,
};
use crate::parser::fixers::apply_template_arguments;
use crate::parser::row::RowTyper;
use crate::parser::variables::contains_variable;
use crate::recognizer::RecognizerSet;
use crate::tokens::{RobotToken, TokenId, TokenType};

#[derive(Debug, Clone, Copy)]
enum Direction {
    Up,
    Down,
}

type Events = Result<Vec<ModelEvent>, EditError>;

impl RobotFile {
    /// Apply one edit. On success the file's edit version is bumped and the
    /// returned [`Patch`] lists what changed; on error nothing changed.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        log::debug!("applying {cmd:?}");
        let events = match cmd {
            Cmd::SetTokenText { token, text } => self.set_token_text(token, text)?,
            Cmd::AddElement {
                owner,
                kind,
                index,
                cells,
            } => self.add_element(owner, kind, index, cells)?,
            Cmd::RemoveElement { id } => self.remove_element(id)?,
            Cmd::MoveElementUp { id } => self.move_element(id, Direction::Up)?,
            Cmd::MoveElementDown { id } => self.move_element(id, Direction::Down)?,
            Cmd::InsertValue {
                element,
                index,
                text,
            } => self.insert_element_value(element, index, text)?,
            Cmd::RemoveValue { element, index } => self.remove_element_value(element, index)?,
            Cmd::SetComment { element, text } => self.set_element_comment(element, text)?,
            Cmd::AddHolder { table, name, index } => self.add_holder(table, name, index)?,
            Cmd::RemoveHolder { id } => self.remove_holder(id)?,
            Cmd::MoveHolderUp { id } => self.move_holder(id, Direction::Up)?,
            Cmd::MoveHolderDown { id } => self.move_holder(id, Direction::Down)?,
        };
        // Any edit may add, change or drop a template setting.
        apply_template_arguments(self);
        self.edit_version += 1;
        Ok(Patch {
            version: self.edit_version,
            events,
        })
    }

    fn set_token_text(&mut self, token: TokenId, text: String) -> Events {
        if self.get_token(token).is_none() {
            return Err(EditError::UnknownToken(token));
        }
        self.token_mut(token).set_text(text);

        // New text can change the role of the token and of those after it.
        let owner = self
            .elements()
            .find(|e| e.contains(token))
            .map(ModelElement::id);
        if let Some(path) = owner.and_then(|id| self.find_element(id)) {
            self.retype(path);
        }
        Ok(vec![ModelEvent::TokenChanged { token }])
    }

    fn add_element(
        &mut self,
        owner: ElementOwner,
        kind: ElementKind,
        index: Option<usize>,
        cells: Vec<String>,
    ) -> Events {
        let (table, holder) = match owner {
            ElementOwner::Table(table) => {
                if kind.holder().is_some() || kind.table() != table {
                    return Err(EditError::KindMismatch { kind });
                }
                (table, None)
            }
            ElementOwner::Holder(id) => {
                let (table, holder) = self.find_holder(id).ok_or(EditError::UnknownHolder(id))?;
                if kind.holder() != table.holder() {
                    return Err(EditError::KindMismatch { kind });
                }
                (table, Some(holder))
            }
        };

        let len = self.sibling_count(table, holder);
        let index = index.unwrap_or(len);
        if index > len {
            return Err(EditError::IndexOutOfRange { index, len });
        }

        let (declaration, values) = match kind.canonical_declaration() {
            Some(name) => (name.to_string(), cells),
            None => {
                let mut cells = cells.into_iter();
                let first = cells
                    .next()
                    .ok_or(EditError::IndexOutOfRange { index: 0, len: 0 })?;
                (first, cells.collect())
            }
        };

        let mut events = Vec::new();
        let section = match holder {
            None => {
                let existed = self.has_table(table);
                let next = self
                    .element_table(table)
                    .and_then(|t| t.elements.get(index))
                    .map(|e| e.section);
                let section = match next {
                    Some(section) => section,
                    None => self.ensure_section(table),
                };
                if !existed {
                    events.push(ModelEvent::TableCreated { table });
                }
                section
            }
            Some(holder) => self
                .holder_table(table)
                .and_then(|t| t.holders.get(holder))
                .map_or(0, |h| h.section),
        };

        let declaration =
            self.add_token(RobotToken::created(declaration, TokenType::for_declaration(kind)));
        let values: Vec<TokenId> = values
            .into_iter()
            .map(|text| {
                self.add_token(RobotToken::created(
                    text,
                    TokenType::for_value(kind, ValueRole::Value),
                ))
            })
            .collect();

        let mut element = ModelElement::new(kind);
        element.section = section;
        element.set_declaration(declaration);
        for value in values {
            element.push_value(value);
        }
        element.mark_structure_dirty();
        let id = element.id();

        let path = ElementPath {
            table,
            holder,
            index,
        };
        let siblings = self
            .siblings_mut(path)
            .ok_or(EditError::KindMismatch { kind })?;
        siblings.insert(index, element);
        self.retype(path);

        events.push(ModelEvent::ElementAdded { id, index });
        Ok(events)
    }

    fn remove_element(&mut self, id: ElementId) -> Events {
        let path = self.find_element(id).ok_or(EditError::UnknownElement(id))?;
        let siblings = self
            .siblings_mut(path)
            .ok_or(EditError::UnknownElement(id))?;
        let mut removed = siblings.remove(path.index);
        let trivia = removed.take_trivia_lines();
        if !trivia.is_empty() {
            self.adopt_trivia(path, removed.section, trivia);
        }
        Ok(vec![ModelEvent::ElementRemoved { id }])
    }

    /// Give the blank and comment lines of a removed element to whatever
    /// now precedes them.
    fn adopt_trivia(&mut self, removed: ElementPath, section: usize, lines: Vec<usize>) {
        if let Some(previous) = removed.index.checked_sub(1)
            && let Some(element) = self.element_at_path_mut(ElementPath {
                index: previous,
                ..removed
            })
            && (removed.holder.is_some() || element.section == section)
        {
            for line in lines {
                element.own_line(line, false);
            }
            return;
        }
        match removed.holder {
            Some(holder) => {
                if let Some(holder) = self
                    .holder_table_mut(removed.table)
                    .and_then(|t| t.holders.get_mut(holder))
                {
                    holder.trailing.extend(lines);
                }
            }
            None => {
                if let Some(section) = self.sections.get_mut(section) {
                    section.trailing.extend(lines);
                }
            }
        }
    }

    fn move_element(&mut self, id: ElementId, direction: Direction) -> Events {
        let path = self.find_element(id).ok_or(EditError::UnknownElement(id))?;
        let siblings = self
            .siblings_mut(path)
            .ok_or(EditError::UnknownElement(id))?;
        let from = path.index;
        let to = neighbour(from, siblings.len(), direction).ok_or(EditError::AlreadyAtEdge(id))?;

        // Sections stay with the slot so a move never crosses a header.
        let (from_section, to_section) = (siblings[from].section, siblings[to].section);
        siblings.swap(from, to);
        siblings[from].section = from_section;
        siblings[to].section = to_section;
        for slot in [from, to] {
            if siblings[slot].shares_holder_line {
                siblings[slot].mark_structure_dirty();
            }
        }
        Ok(vec![ModelEvent::ElementMoved { id, from, to }])
    }

    fn insert_element_value(&mut self, id: ElementId, index: usize, text: String) -> Events {
        let path = self.find_element(id).ok_or(EditError::UnknownElement(id))?;
        let (kind, len) = self
            .element_at_path(path)
            .map(|e| (e.kind(), e.values().len()))
            .ok_or(EditError::UnknownElement(id))?;
        if index > len {
            return Err(EditError::IndexOutOfRange { index, len });
        }
        let token = self.add_token(RobotToken::created(
            text,
            TokenType::for_value(kind, ValueRole::Value),
        ));
        if let Some(element) = self.element_at_path_mut(path) {
            element.insert_value(index, token);
        }
        self.retype(path);
        Ok(vec![ModelEvent::ElementChanged { id }])
    }

    fn remove_element_value(&mut self, id: ElementId, index: usize) -> Events {
        let path = self.find_element(id).ok_or(EditError::UnknownElement(id))?;
        let element = self
            .element_at_path_mut(path)
            .ok_or(EditError::UnknownElement(id))?;
        let len = element.values().len();
        if index >= len {
            return Err(EditError::IndexOutOfRange { index, len });
        }
        element.remove_value(index);
        self.retype(path);
        Ok(vec![ModelEvent::ElementChanged { id }])
    }

    fn set_element_comment(&mut self, id: ElementId, text: Option<String>) -> Events {
        let path = self.find_element(id).ok_or(EditError::UnknownElement(id))?;
        let comments = match text {
            Some(text) => {
                let text = if text.starts_with('#') {
                    text
                } else {
                    format!("# {text}")
                };
                vec![self.add_token(RobotToken::created(text, TokenType::StartHashComment))]
            }
            None => Vec::new(),
        };
        let element = self
            .element_at_path_mut(path)
            .ok_or(EditError::UnknownElement(id))?;
        element.replace_comments(comments);
        Ok(vec![ModelEvent::ElementChanged { id }])
    }

    fn add_holder(&mut self, table: TableKind, name: String, index: Option<usize>) -> Events {
        let kind = table.holder().ok_or(EditError::NotAHolderTable(table))?;
        let len = self.holder_table(table).map_or(0, |t| t.holders.len());
        let index = index.unwrap_or(len);
        if index > len {
            return Err(EditError::IndexOutOfRange { index, len });
        }

        let mut events = Vec::new();
        let existed = self.has_table(table);
        let next = self
            .holder_table(table)
            .and_then(|t| t.holders.get(index))
            .map(|h| h.section);
        let section = match next {
            Some(section) => section,
            None => self.ensure_section(table),
        };
        if !existed {
            events.push(ModelEvent::TableCreated { table });
        }

        let name = self.add_token(RobotToken::created(name, TokenType::HolderName(kind)));
        let holder = ExecutableHolder::new(kind, name, section);
        let id = holder.id();
        let holders = &mut self
            .holder_table_mut(table)
            .ok_or(EditError::NotAHolderTable(table))?
            .holders;
        holders.insert(index, holder);

        events.push(ModelEvent::HolderAdded { id, index });
        Ok(events)
    }

    fn remove_holder(&mut self, id: ElementId) -> Events {
        let (table, index) = self.find_holder(id).ok_or(EditError::UnknownHolder(id))?;
        let holders = &mut self
            .holder_table_mut(table)
            .ok_or(EditError::UnknownHolder(id))?
            .holders;
        let removed = holders.remove(index);

        // Only the blank lines that separated it from the next block survive.
        let tail: Vec<usize> = match removed.elements.last() {
            Some(last) => last.trivia_lines().collect(),
            None => removed.trailing.clone(),
        };
        let blanks: Vec<usize> = tail
            .into_iter()
            .filter(|&line| self.lines.get(line).is_some_and(|l| l.tokens().next().is_none()))
            .collect();
        if blanks.is_empty() {
            return Ok(vec![ModelEvent::HolderRemoved { id }]);
        }

        let holders = self.holder_table(table).map_or(&[][..], |t| &t.holders[..]);
        let previous = index
            .checked_sub(1)
            .filter(|&i| holders.get(i).is_some_and(|h| h.section == removed.section));
        match previous {
            Some(previous) => {
                if let Some(holder) = self
                    .holder_table_mut(table)
                    .and_then(|t| t.holders.get_mut(previous))
                {
                    match holder.elements.last_mut() {
                        Some(element) => {
                            for line in blanks {
                                element.own_line(line, false);
                            }
                        }
                        None => holder.trailing.extend(blanks),
                    }
                }
            }
            None => {
                if let Some(section) = self.sections.get_mut(removed.section) {
                    section.trailing.extend(blanks);
                }
            }
        }
        Ok(vec![ModelEvent::HolderRemoved { id }])
    }

    fn move_holder(&mut self, id: ElementId, direction: Direction) -> Events {
        let (table, from) = self.find_holder(id).ok_or(EditError::UnknownHolder(id))?;
        let holders = &mut self
            .holder_table_mut(table)
            .ok_or(EditError::UnknownHolder(id))?
            .holders;
        let to = neighbour(from, holders.len(), direction).ok_or(EditError::AlreadyAtEdge(id))?;
        let (from_section, to_section) = (holders[from].section, holders[to].section);
        holders.swap(from, to);
        holders[from].section = from_section;
        holders[to].section = to_section;
        Ok(vec![ModelEvent::HolderMoved { id, from, to }])
    }

    fn sibling_count(&self, table: TableKind, holder: Option<usize>) -> usize {
        match holder {
            None => self.element_table(table).map_or(0, |t| t.elements.len()),
            Some(holder) => self
                .holder_table(table)
                .and_then(|t| t.holders.get(holder))
                .map_or(0, |h| h.elements.len()),
        }
    }

    /// Re-derive the types of an element's tokens after its values changed.
    fn retype(&mut self, path: ElementPath) {
        let Some(element) = self.element_at_path(path) else {
            return;
        };
        let kind = element.kind();
        match kind {
            ElementKind::ExecutableRow(holder) => {
                let cells: Vec<TokenId> = element
                    .declaration()
                    .into_iter()
                    .chain(element.values().iter().copied())
                    .collect();
                let recognizers = RecognizerSet::for_version(self.version());
                let mut typer = RowTyper::new(holder);
                for id in cells {
                    let text = self.token_text(id).to_string();
                    let types = typer.next(&text, &recognizers.candidate_types(&text));
                    self.token_mut(id).set_types(types);
                }
            }
            _ => {
                let values = element.values().to_vec();
                let roles = kind
                    .grammar()
                    .roles(values.iter().map(|id| self.token_text(*id)));
                for (id, role) in values.into_iter().zip(roles) {
                    let mut types = vec![TokenType::for_value(kind, role)];
                    if contains_variable(self.token_text(id)) {
                        types.push(TokenType::VariableUsage);
                    }
                    self.token_mut(id).set_types(types);
                }
            }
        }
    }
}

fn neighbour(index: usize, len: usize, direction: Direction) -> Option<usize> {
    match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => Some(index + 1).filter(|&next| next < len),
    }
}
