/// A static navigation target handed to the router.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct MenuLink {
    pub label: &'static str,
    pub path: &'static str,
}

/// Menu entries in display order.
pub const MENU_LINKS: [MenuLink; 3] = [
    MenuLink {
        label: "Home",
        path: "/",
    },
    MenuLink {
        label: "Contact Us",
        path: "/contact-us",
    },
    MenuLink {
        label: "Our Clients",
        path: "/clients",
    },
];

/// Link at `index`, if any.
pub fn link(index: usize) -> Option<&'static MenuLink> {
    MENU_LINKS.get(index)
}
