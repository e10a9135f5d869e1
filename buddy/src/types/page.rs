use serde::{Deserialize, Serialize};

/// One page of a paginated listing: `{ content: [...], last: bool }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Whether this is the final page.
    pub last: bool,
}

impl<T> Page<T> {
    /// Wrap an unpaginated list as a single, final page.
    pub fn single(content: Vec<T>) -> Self {
        Self {
            content,
            last: true,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            last: self.last,
        }
    }

    /// Like [`Page::map`], failing on the first item `f` rejects.
    pub fn try_map<U, E, F: FnMut(T) -> Result<U, E>>(self, f: F) -> Result<Page<U>, E> {
        Ok(Page {
            content: self.content.into_iter().map(f).collect::<Result<_, _>>()?,
            last: self.last,
        })
    }
}

/// The friends listing nests its content one level deeper:
/// `{ friends: { content: [...] }, last: bool }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendsPage<T> {
    pub friends: Content<T>,
    pub last: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content<T> {
    pub content: Vec<T>,
}

impl<T> From<FriendsPage<T>> for Page<T> {
    fn from(page: FriendsPage<T>) -> Self {
        Page {
            content: page.friends.content,
            last: page.last,
        }
    }
}
