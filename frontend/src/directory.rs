/// Known user names: fetched once, then patched by `AddUser`/`RemoveUser` frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserDirectory {
    /// `None` until the initial fetch settles.
    users: Option<Vec<String>>,
}

impl UserDirectory {
    pub fn is_loading(&self) -> bool {
        self.users.is_none()
    }

    pub fn set_fetched(&mut self, users: Vec<String>) {
        self.users = Some(users);
    }

    /// Adds `name` once; a directory still loading starts with just this name.
    pub fn add(&mut self, name: &str) {
        let users = self.users.get_or_insert_with(Vec::new);
        if !users.iter().any(|user| user == name) {
            users.push(name.to_string());
        }
    }

    pub fn remove(&mut self, name: &str) {
        if let Some(users) = &mut self.users {
            users.retain(|user| user != name);
        }
    }

    /// Everyone one could chat with, i.e. all users except `identity`.
    pub fn contacts_for(&self, identity: Option<&str>) -> Vec<String> {
        self.users
            .iter()
            .flatten()
            .filter(|user| Some(user.as_str()) != identity)
            .cloned()
            .collect()
    }
}
