#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Pastor = 2,
    Leader = 3,
    Member = 4,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Pastor),
            3 => Some(Role::Leader),
            4 => Some(Role::Member),
            _ => None,
        }
    }
}
