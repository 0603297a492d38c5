//! Реестр комнат: одна игровая комната на код.

use std::collections::HashMap;

use crate::domain::{Room, RoomCode};

/// Все живые комнаты процесса. Владеет состоянием; движок получает
/// `&mut Room` на время обработки одной команды или тика.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Создать комнату. None, если код уже занят.
    pub fn create(&mut self, code: RoomCode) -> Option<&mut Room> {
        if self.rooms.contains_key(&code) {
            return None;
        }
        let room = Room::new(code.clone());
        self.rooms.insert(code.clone(), room);
        self.rooms.get_mut(&code)
    }

    pub fn get(&self, code: &str) -> Option<&Room> {
        self.rooms.get(code)
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// Удалить комнату (например, законченную партию).
    pub fn remove(&mut self, code: &str) -> Option<Room> {
        self.rooms.remove(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &RoomCode> {
        self.rooms.keys()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Room> {
        self.rooms.values_mut()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
