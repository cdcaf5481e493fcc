//! Environment variable store
//!
//! One owned, insertion-ordered sequence of variables, projected as two
//! views: the lookup view (valued entries, insertion order) drives
//! expansion, `$PATH` search, `env` and envp construction; the exported
//! view (every entry, sorted by name) drives `export` with no arguments.
//! A name-only declaration (`export NAME`) is an entry with no value: it
//! shows up in the exported view but never expands or reaches a child.

/// A single variable. `value: None` means declared but not assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    pub name: String,
    pub value: Option<String>,
}

/// The shell's variable store, owned by the top-level loop.
#[derive(Debug, Clone)]
pub struct Environment {
    vars: Vec<EnvVar>,
}

impl Environment {
    /// Ingest the process environment, one entry per `name=value` pair.
    pub fn new() -> Self {
        Self::from_pairs(std::env::vars())
    }

    /// Build a store from explicit pairs (empty iterator for tests).
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut env = Environment { vars: Vec::new() };
        for (name, value) in pairs {
            env.set(&name.into(), &value.into());
        }
        env
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.vars.iter().position(|v| v.name == name)
    }

    /// Value of `name`, if assigned. Name-only declarations return `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|v| v.name == name)
            .and_then(|v| v.value.as_deref())
    }

    /// Set or replace. A replaced entry keeps its insertion position.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.position(name) {
            Some(i) => self.vars[i].value = Some(value.to_string()),
            None => self.vars.push(EnvVar {
                name: name.to_string(),
                value: Some(value.to_string()),
            }),
        }
    }

    /// Declare `name` without a value. No-op when the name already exists.
    pub fn declare(&mut self, name: &str) {
        if self.position(name).is_none() {
            self.vars.push(EnvVar {
                name: name.to_string(),
                value: None,
            });
        }
    }

    /// Append to an existing value (`export NAME+=suffix`); assigns when
    /// the name is absent or declared without a value.
    pub fn append(&mut self, name: &str, value: &str) {
        match self.position(name) {
            Some(i) => match &mut self.vars[i].value {
                Some(existing) => existing.push_str(value),
                slot => *slot = Some(value.to_string()),
            },
            None => self.set(name, value),
        }
    }

    /// Remove `name` from the store. Absent names are silently ignored.
    pub fn unset(&mut self, name: &str) {
        self.vars.retain(|v| v.name != name);
    }

    /// Lookup view: valued entries in insertion order.
    pub fn lookup(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars
            .iter()
            .filter_map(|v| v.value.as_deref().map(|value| (v.name.as_str(), value)))
    }

    /// Exported view: every entry, sorted ascending by name.
    pub fn exported(&self) -> Vec<&EnvVar> {
        let mut view: Vec<&EnvVar> = self.vars.iter().collect();
        view.sort_by(|a, b| a.name.cmp(&b.name));
        view
    }

    /// `name=value` strings for `execve`. Empty values yield `name=`.
    pub fn envp(&self) -> Vec<String> {
        self.lookup()
            .map(|(name, value)| format!("{name}={value}"))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Environment {
        Environment::from_pairs([("PATH", "/bin:/usr/bin"), ("HOME", "/home/alice")])
    }

    #[test]
    fn get_returns_assigned_value() {
        let env = store();
        assert_eq!(env.get("HOME"), Some("/home/alice"));
        assert_eq!(env.get("MISSING"), None);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut env = store();
        env.set("PATH", "/sbin");
        assert_eq!(env.get("PATH"), Some("/sbin"));
        // insertion order preserved
        let names: Vec<&str> = env.lookup().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["PATH", "HOME"]);
    }

    #[test]
    fn declare_is_invisible_to_lookup() {
        let mut env = store();
        env.declare("NEW");
        assert_eq!(env.get("NEW"), None);
        assert_eq!(env.lookup().count(), 2);
        assert_eq!(env.len(), 3);
    }

    #[test]
    fn declare_keeps_existing_value() {
        let mut env = store();
        env.declare("HOME");
        assert_eq!(env.get("HOME"), Some("/home/alice"));
    }

    #[test]
    fn append_extends_existing() {
        let mut env = store();
        env.append("PATH", ":/opt/bin");
        assert_eq!(env.get("PATH"), Some("/bin:/usr/bin:/opt/bin"));
    }

    #[test]
    fn append_assigns_when_absent() {
        let mut env = store();
        env.append("FRESH", "x");
        assert_eq!(env.get("FRESH"), Some("x"));
    }

    #[test]
    fn append_fills_name_only_entry() {
        let mut env = store();
        env.declare("D");
        env.append("D", "v");
        assert_eq!(env.get("D"), Some("v"));
    }

    #[test]
    fn unset_removes_and_ignores_absent() {
        let mut env = store();
        env.unset("HOME");
        assert_eq!(env.get("HOME"), None);
        assert_eq!(env.len(), 1);
        env.unset("NOT_THERE");
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn exported_is_sorted() {
        let mut env = Environment::from_pairs([("Z", "1"), ("A", "2"), ("M", "3")]);
        env.declare("B");
        let names: Vec<&str> = env.exported().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "M", "Z"]);
    }

    #[test]
    fn set_twice_is_idempotent() {
        let mut env = store();
        env.set("X", "1");
        let snapshot = env.clone();
        env.set("X", "1");
        assert_eq!(env.lookup().collect::<Vec<_>>(), snapshot.lookup().collect::<Vec<_>>());
    }

    #[test]
    fn set_then_unset_restores_pre_state() {
        let env = store();
        let mut mutated = env.clone();
        mutated.set("X", "1");
        mutated.unset("X");
        assert_eq!(
            mutated.lookup().collect::<Vec<_>>(),
            env.lookup().collect::<Vec<_>>()
        );
    }

    #[test]
    fn envp_includes_empty_values() {
        let mut env = Environment::from_pairs([("A", "1")]);
        env.set("B", "");
        env.declare("C");
        assert_eq!(env.envp(), vec!["A=1".to_string(), "B=".to_string()]);
    }
}
