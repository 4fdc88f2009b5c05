use iced::widget::{button, column, container, image, mouse_area, row, text, Row, Space};
use iced::{Alignment, Element, Length};

use crate::images::{ImageCache, ImageResolver};
use crate::state::data::{AttributeRef, Product, Variant, VariantKind};
use crate::state::detail::{DetailPage, ProductSlot};
use crate::Message;

/// Product detail page
pub fn view<'a>(page: &'a DetailPage, resolver: &ImageResolver, images: &ImageCache) -> Element<'a, Message> {
    let back = button(text("‹ Back to products"))
        .on_press(Message::BackToListing)
        .style(button::text);

    let body: Element<'a, Message> = match page.product() {
        ProductSlot::Loading => text("Loading...").into(),
        ProductSlot::Unavailable => text("Product unavailable.").into(),
        ProductSlot::Loaded(product) => product_view(page, product, resolver, images),
    };

    column![back, body].spacing(16).padding(32).into()
}

fn product_view<'a>(
    page: &'a DetailPage,
    product: &'a Product,
    resolver: &ImageResolver,
    images: &ImageCache,
) -> Element<'a, Message> {
    let gallery = page.gallery();

    let big_image = image(images.handle(&resolver.resolve(gallery.selected_image())))
        .width(Length::Fill)
        .height(Length::Fixed(400.0));

    let thumbnails = gallery
        .visible_images()
        .iter()
        .fold(Row::new().spacing(24), |thumbnails, image_id| {
            let source = resolver.resolve(Some(image_id));
            thumbnails.push(
                mouse_area(
                    image(images.handle(&source))
                        .width(Length::Fixed(150.0))
                        .height(Length::Fixed(150.0)),
                )
                .on_press(Message::SelectImage(image_id.clone())),
            )
        });

    let carousel = row![
        button(text("‹")).on_press_maybe(gallery.can_retreat().then_some(Message::CarouselPrevious)),
        thumbnails,
        button(text("›")).on_press_maybe(gallery.can_advance().then_some(Message::CarouselNext)),
    ]
    .spacing(16)
    .align_y(Alignment::Center);

    let details = column![
        text(product.name.as_str()).size(24),
        text(format!(
            "Material: {} / {} .  Finish: {}",
            ref_name(&product.top_material),
            ref_name(&product.leg_material),
            ref_name(&product.top_finish),
        ))
        .size(14),
    ]
    .spacing(8);

    let mut content = column![big_image, container(carousel).center_x(Length::Fill), details].spacing(32);

    if page.variants().has_any() {
        let strips = page
            .variants()
            .strips()
            .fold(column![].spacing(32), |strips, (kind, variants)| {
                strips.push(variant_strip(kind, variants, resolver, images))
            });
        content = content.push(column![Space::with_height(16), strips]);
    }

    content.into()
}

fn ref_name(reference: &Option<AttributeRef>) -> &str {
    reference.as_ref().map(|r| r.name.as_str()).unwrap_or_default()
}

/// Thumbnail strip for one non-empty variant collection
fn variant_strip<'a>(
    kind: VariantKind,
    variants: &'a [Variant],
    resolver: &ImageResolver,
    images: &ImageCache,
) -> Element<'a, Message> {
    let (width, height) = match kind {
        VariantKind::Top => (100.0, 50.0),
        VariantKind::Edge => (100.0, 18.0),
        VariantKind::Finish => (100.0, 80.0),
    };

    variants
        .iter()
        .enumerate()
        .fold(Row::new().spacing(32).align_y(Alignment::Center), |strip, (index, variant)| {
            let source = resolver.resolve(variant.first_image());
            let tile = column![
                image(images.handle(&source))
                    .width(Length::Fixed(width))
                    .height(Length::Fixed(height)),
                text(variant.display_name(kind)).size(14),
            ]
            .spacing(4)
            .align_x(Alignment::Center);

            strip.push(mouse_area(tile).on_press(Message::SelectVariant(kind, index)))
        })
        .into()
}
