use super::ItemState;

#[derive(Debug)]
pub enum Action {
    LoadItems(ItemState),
    AddItem { title: String, state: ItemState },
    RemoveItem(String), // Item title
    ClearItems,
    RemoveStore,
}
