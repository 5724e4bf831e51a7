use crate::domain::theme::Theme;
use crate::domain::todo::{Todo, TodoId};
use crate::repo::KeyValueStore;
use crate::usecase::theme::ThemePreference;
use crate::usecase::todo_store::TodoStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App<S: KeyValueStore> {
    store: TodoStore<S>,
    theme_pref: ThemePreference<S>,
    pub theme: Theme,
    pub selected: usize,
    pub mode: InputMode,
    pub input: String,
    pub status: Option<String>,
}

impl<S: KeyValueStore> App<S> {
    /// Hydrates the store and restores the theme before the first draw.
    pub fn new(mut store: TodoStore<S>, theme_pref: ThemePreference<S>) -> Self {
        store.hydrate();
        let theme = theme_pref.load();
        Self {
            store,
            theme_pref,
            theme,
            selected: 0,
            mode: InputMode::Normal,
            input: String::new(),
            status: None,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        self.store.todos()
    }

    pub fn counts(&self) -> (usize, usize) {
        self.store.counts()
    }

    pub fn reload(&mut self) {
        match self.store.reload() {
            Ok(()) => {
                self.clamp_selection();
                self.set_status("Reloaded");
            }
            Err(err) => self.report(&err),
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.store.len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn select_next(&mut self) {
        if !self.store.is_empty() {
            self.selected = (self.selected + 1).min(self.store.len() - 1);
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    fn selected_id(&self) -> Option<TodoId> {
        self.store.todos().get(self.selected).map(|t| t.id)
    }

    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.store.toggle(id) {
            Ok(_) => {
                let done = self.store.get(id).is_some_and(|t| t.completed);
                self.set_status(if done { "Completed" } else { "Reopened" });
            }
            Err(err) => self.report(&err),
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.store.remove(id) {
            Ok(_) => {
                self.clamp_selection();
                self.set_status("Deleted");
            }
            Err(err) => self.report(&err),
        }
    }

    pub fn add_todo(&mut self) {
        match self.store.add(&self.input) {
            Ok(None) => self.set_status("Cannot add an empty task"),
            Ok(Some(_)) => {
                self.input.clear();
                self.mode = InputMode::Normal;
                self.selected = 0;
                self.set_status("Added");
            }
            Err(err) => self.report(&err),
        }
    }

    pub fn toggle_theme(&mut self) {
        match self.theme_pref.toggle() {
            Ok(next) => {
                self.theme = next;
                self.set_status(if next.is_dark() { "Dark mode" } else { "Light mode" });
            }
            Err(err) => self.report(&err),
        }
    }

    pub fn set_status(&mut self, msg: &str) {
        self.status = Some(msg.to_string());
    }

    fn report(&mut self, err: &anyhow::Error) {
        let msg = format!("{err:#}");
        tracing::error!(error = %msg, "storage access failed");
        self.set_status(&format!("Error: {msg}"));
    }
}
