/// Product listing page: facet dropdowns above a grid of product cards
use iced::widget::{button, column, container, image, row, text, Column};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;

use crate::images::{ImageCache, ImageResolver};
use crate::state::data::{Facet, Product};
use crate::state::filter::FilterStateManager;
use crate::Message;

const CARD_WIDTH: f32 = 260.0;
const CARD_IMAGE_HEIGHT: f32 = 180.0;

pub fn view<'a>(
    listing: &'a FilterStateManager,
    resolver: &ImageResolver,
    images: &ImageCache,
) -> Element<'a, Message> {
    let header = column![
        text(format!("{}s", listing.category())).size(40),
        text(
            "Explore our collection that combines timeless classic designs \
             with contemporary elements."
        )
        .size(16),
    ]
    .spacing(12)
    .align_x(Alignment::Center);

    let dropdowns = Facet::ALL
        .iter()
        .fold(row![].spacing(24), |row, facet| row.push(dropdown(listing, *facet)));

    let products: Element<'a, Message> = if listing.shows_no_products() {
        container(text("No products available.").size(18))
            .padding(40)
            .center_x(Length::Fill)
            .into()
    } else {
        let cards = listing
            .products()
            .iter()
            .map(|product| product_card(product, resolver, images))
            .collect();
        Wrap::with_elements(cards)
            .spacing(24.0)
            .line_spacing(24.0)
            .into()
    };

    column![header, dropdowns, products]
        .spacing(32)
        .padding(32)
        .align_x(Alignment::Center)
        .into()
}

/// Dropdown button for one facet, with its option panel when open
fn dropdown<'a>(listing: &'a FilterStateManager, facet: Facet) -> Element<'a, Message> {
    let arrow = if listing.open_dropdown() == Some(facet) { "▴" } else { "▾" };
    let toggle = button(text(format!("{} {}", facet.label(), arrow)))
        .on_press(Message::ToggleDropdown(facet))
        .style(button::text);

    let Some(options) = listing.visible_options(facet) else {
        return toggle.into();
    };

    let panel = options.iter().fold(Column::new().width(Length::Fixed(140.0)), |panel, option| {
        panel.push(
            button(text(option.name.as_str()))
                .width(Length::Fill)
                .on_press(Message::SelectOption(facet, option.id.clone()))
                .style(button::secondary),
        )
    });

    column![toggle, container(panel).style(container::bordered_box)]
        .spacing(4)
        .into()
}

fn product_card<'a>(
    product: &'a Product,
    resolver: &ImageResolver,
    images: &ImageCache,
) -> Element<'a, Message> {
    let source = resolver.resolve(product.first_image());

    let content = column![
        image(images.handle(&source))
            .width(Length::Fill)
            .height(Length::Fixed(CARD_IMAGE_HEIGHT)),
        text(product.name.as_str()).size(17),
    ]
    .spacing(8)
    .align_x(Alignment::Center);

    button(content)
        .width(Length::Fixed(CARD_WIDTH))
        .padding(12)
        .on_press(Message::OpenProduct(product.id.clone()))
        .style(button::secondary)
        .into()
}
