use egui::{Align2, Color32, ColorImage, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use fxhash::FxHashMap;
use sittermap::{
    booking::{AdditionalService, BookingFlow, BookingStep, BookingType, FlowOutcome, DURATION_CHOICES},
    constants::TILE_SIZE,
    data::source::ListingsLoad,
    geolocation::{CachedLocator, FixedLocator, UnsupportedLocator},
    tiles::{TileCache, TileFetcher, TileKey, TileLoader, TileResult, TileState},
    ui::{FAILED_TILE_BORDER, FAILED_TILE_FILL, LOADING_TILES_TEXT},
    GeoPosition, GeolocationError, GeolocationProvider, InputEvent, InteractiveMap, MapConfig,
    MapControl, Point,
};
use std::sync::Arc;

type LocateResult = Result<GeoPosition, GeolocationError>;

const MARKER_COLOR: Color32 = Color32::from_rgb(37, 99, 235);
const SELECTED_COLOR: Color32 = Color32::from_rgb(220, 38, 38);
const USER_COLOR: Color32 = Color32::from_rgb(59, 130, 246);

fn rgb([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgb(r, g, b)
}

fn to_pos(origin: Pos2, p: Point) -> Pos2 {
    origin + Vec2::new(p.x as f32, p.y as f32)
}

fn heart_button(ui: &mut egui::Ui, favorite: bool) -> egui::Response {
    let (icon, color) = if favorite {
        ("♥", SELECTED_COLOR)
    } else {
        ("♡", Color32::GRAY)
    };
    let tooltip = if favorite { "Remove from favorites" } else { "Add to favorites" };
    ui.add(egui::Button::new(egui::RichText::new(icon).color(color)).frame(false))
        .on_hover_text(tooltip)
}

fn decode_tile(bytes: &[u8]) -> Option<ColorImage> {
    let img = image::load_from_memory(bytes).ok()?.to_rgba8();
    let (width, height) = img.dimensions();
    Some(ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        &img.into_raw(),
    ))
}

pub struct SitterMapApp {
    map: InteractiveMap,
    loader: TileLoader,
    tile_rx: crossbeam_channel::Receiver<TileResult>,
    textures: FxHashMap<TileKey, egui::TextureHandle>,
    locator: Arc<dyn GeolocationProvider>,
    locate_tx: crossbeam_channel::Sender<LocateResult>,
    locate_rx: crossbeam_channel::Receiver<LocateResult>,
    runtime: tokio::runtime::Handle,
    listings_notice: Option<String>,
    booking: Option<BookingFlow>,
}

impl SitterMapApp {
    pub fn new(
        config: MapConfig,
        listings: ListingsLoad,
        runtime: tokio::runtime::Handle,
    ) -> anyhow::Result<Self> {
        let (tile_tx, tile_rx) = crossbeam_channel::unbounded();
        let (locate_tx, locate_rx) = crossbeam_channel::unbounded();

        let loader = TileLoader::new(
            TileFetcher::new(&config.tiles.user_agent)?,
            TileCache::new(config.tiles.cache_size),
            tile_tx,
            runtime.clone(),
        );

        let locator: Arc<dyn GeolocationProvider> = match config.home_location {
            Some(home) => Arc::new(CachedLocator::new(FixedLocator::at(home, Some(30.0)))),
            None => Arc::new(UnsupportedLocator),
        };

        let listings_notice = match (&listings.error, listings.from_fallback) {
            (Some(e), _) => Some(format!("Could not reach the listing store ({}). Showing sample sitters.", e)),
            (None, true) => Some("Listing store not configured. Showing sample sitters.".to_string()),
            (None, false) => None,
        };

        let mut map = InteractiveMap::new(config);
        map.set_listings(listings.listings);

        Ok(Self {
            map,
            loader,
            tile_rx,
            textures: FxHashMap::default(),
            locator,
            locate_tx,
            locate_rx,
            runtime,
            listings_notice,
            booking: None,
        })
    }

    fn drain_channels(&mut self, ctx: &egui::Context) {
        for result in self.tile_rx.try_iter() {
            self.map.record_tile(&result);
            if let Ok(bytes) = &result.result {
                match decode_tile(bytes) {
                    Some(image) => {
                        let c = result.key.coord;
                        let texture = ctx.load_texture(
                            format!("tile_{:?}_{}_{}_{}", result.key.style, c.z, c.x, c.y),
                            image,
                            egui::TextureOptions::default(),
                        );
                        self.textures.insert(result.key, texture);
                    }
                    None => log::warn!("could not decode tile {:?}", result.key.coord),
                }
            }
        }

        for result in self.locate_rx.try_iter() {
            self.map.finish_locate(result);
        }

        for event in self.map.process_events() {
            log::debug!("map event: {:?}", event);
        }
    }

    fn start_locate(&mut self) {
        if !self.map.activate(MapControl::Locate) {
            return;
        }
        let locator = self.locator.clone();
        let options = self.map.config().geolocation.clone();
        let tx = self.locate_tx.clone();
        self.runtime.spawn(async move {
            let result = locator.current_position(&options).await;
            let _ = tx.send(result);
        });
    }

    fn listing_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Babysitters");
        if let Some(notice) = &self.listings_notice {
            ui.colored_label(Color32::from_rgb(180, 83, 9), notice);
        }
        ui.separator();

        let selected = self.map.selected().map(str::to_string);
        let mut clicked = None;
        let mut hearted = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for marker in self.map.markers() {
                let Some(listing) = self.map.listing(&marker.id) else {
                    continue;
                };
                let is_selected = selected.as_deref() == Some(marker.id.as_str());
                let mut text = format!(
                    "{}  ★ {:.1}  {}\n{}",
                    listing.display_name(),
                    listing.rating,
                    marker.label(),
                    listing.location
                );
                if let Some(detail) = marker.detail() {
                    text.push_str(&format!("  ·  {}", detail));
                }
                ui.horizontal(|ui| {
                    if heart_button(ui, self.map.is_favorite(&marker.id)).clicked() {
                        hearted = Some(marker.id.clone());
                    }
                    if ui.selectable_label(is_selected, text).clicked() {
                        clicked = Some(if is_selected { None } else { Some(marker.id.clone()) });
                    }
                });
            }
        });

        // selection made in the list flows into the map without an event
        if let Some(selection) = clicked {
            self.map.set_selected(selection);
        }
        if let Some(id) = hearted {
            self.map.toggle_favorite(&id);
        }
    }

    fn draw_tiles(&mut self, painter: &egui::Painter, origin: Pos2) {
        for (key, offset) in self.map.visible_tiles() {
            if self.map.request_tile(key) {
                self.loader.start_download(key);
            }

            let tile_rect = Rect::from_min_size(to_pos(origin, offset), Vec2::splat(TILE_SIZE as f32));
            if let Some(texture) = self.textures.get(&key) {
                painter.image(
                    texture.id(),
                    tile_rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            } else if let Some(TileState::Failed(_)) = self.map.tile_state(&key) {
                painter.rect_filled(tile_rect, 0.0, rgb(FAILED_TILE_FILL));
                painter.rect_stroke(tile_rect, 0.0, Stroke::new(1.0, rgb(FAILED_TILE_BORDER)));
            }
        }
    }

    fn draw_overlays(&self, painter: &egui::Painter, origin: Pos2) {
        if let Some((pixel, ring)) = self.map.user_marker() {
            let center = to_pos(origin, pixel);
            if let Some(diameter) = ring {
                painter.circle_filled(center, diameter as f32 / 2.0, USER_COLOR.linear_multiply(0.2));
            }
            painter.circle_filled(center, 8.0, USER_COLOR);
            painter.circle_stroke(center, 8.0, Stroke::new(2.0, Color32::WHITE));
        }

        let selected = self.map.selected();
        for placed in self.map.visible_markers() {
            let anchor = to_pos(origin, placed.pixel);
            let color = if selected == Some(placed.marker.id.as_str()) {
                SELECTED_COLOR
            } else {
                MARKER_COLOR
            };

            let detail = placed.marker.detail();
            let hit = placed.badge();
            let badge = Rect::from_min_max(to_pos(origin, hit.min), to_pos(origin, hit.max))
                .shrink2(Vec2::new(2.0, 2.0));
            painter.rect_filled(badge, 6.0, color);
            painter.text(
                badge.center_top() + Vec2::new(0.0, 12.0),
                Align2::CENTER_CENTER,
                placed.marker.label(),
                FontId::proportional(13.0),
                Color32::WHITE,
            );
            if let Some(detail) = detail {
                painter.text(
                    badge.center_top() + Vec2::new(0.0, 29.0),
                    Align2::CENTER_CENTER,
                    detail,
                    FontId::proportional(10.0),
                    Color32::WHITE,
                );
            }
            painter.circle_filled(anchor, 3.0, color);
        }
    }

    fn map_area(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let size = rect.size();
        self.map.set_viewport_size(Point::new(size.x as f64, size.y as f64));

        let local = |pos: Pos2| Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
        if let Some(pos) = response.interact_pointer_pos() {
            if response.drag_started() {
                self.map.handle_input(InputEvent::PointerDown { position: local(pos) });
            } else if response.dragged() {
                self.map.handle_input(InputEvent::PointerMove { position: local(pos) });
            }
            if response.clicked() {
                self.map.handle_input(InputEvent::Click { position: local(pos) });
            }
        }
        if response.drag_released() {
            self.map.handle_input(InputEvent::PointerUp);
        } else if self.map.is_dragging() && !ui.input(|i| i.pointer.primary_down()) {
            self.map.handle_input(InputEvent::PointerLeave);
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_rgb(229, 231, 235));
        self.draw_tiles(&painter, rect.min);
        self.draw_overlays(&painter, rect.min);

        if !self.map.tiles_loaded() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                LOADING_TILES_TEXT,
                FontId::proportional(16.0),
                Color32::DARK_GRAY,
            );
        }

        painter.text(
            rect.right_bottom() + Vec2::new(-6.0, -6.0),
            Align2::RIGHT_BOTTOM,
            self.map.attribution(),
            FontId::proportional(11.0),
            Color32::DARK_GRAY,
        );
        painter.text(
            rect.left_bottom() + Vec2::new(6.0, -6.0),
            Align2::LEFT_BOTTOM,
            self.map.status_line(),
            FontId::proportional(11.0),
            Color32::DARK_GRAY,
        );

        self.controls(ui.ctx(), rect);
        self.location_error(ui.ctx(), rect);
        self.popup(ui.ctx(), rect);
    }

    fn controls(&mut self, ctx: &egui::Context, rect: Rect) {
        let mut pressed = None;
        egui::Area::new(egui::Id::new("map_controls"))
            .fixed_pos(rect.right_top() + Vec2::new(-52.0, 10.0))
            .show(ctx, |ui| {
                ui.vertical(|ui| {
                    for state in self.map.controls() {
                        let label = if state.control == MapControl::Locate && self.map.is_locating() {
                            "…"
                        } else {
                            state.label
                        };
                        let button = ui
                            .add_enabled(state.enabled, egui::Button::new(label).min_size(Vec2::splat(36.0)))
                            .on_hover_text(state.control.tooltip());
                        if button.clicked() {
                            pressed = Some(state.control);
                        }
                    }
                });
            });

        match pressed {
            Some(MapControl::Locate) => self.start_locate(),
            Some(control) => {
                self.map.activate(control);
            }
            None => {}
        }
    }

    fn location_error(&mut self, ctx: &egui::Context, rect: Rect) {
        let Some(message) = self.map.location_error_message() else {
            return;
        };
        let mut dismiss = false;
        egui::Area::new(egui::Id::new("location_error"))
            .fixed_pos(rect.left_top() + Vec2::new(10.0, 10.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.colored_label(SELECTED_COLOR, message);
                        dismiss = ui.small_button("✕").clicked();
                    });
                });
            });
        if dismiss {
            self.map.dismiss_location_error();
        }
    }

    fn popup(&mut self, ctx: &egui::Context, rect: Rect) {
        let popup = self.map.popup();
        let Some(listing) = popup
            .open_listing_id
            .as_deref()
            .and_then(|id| self.map.listing(id))
            .cloned()
        else {
            return;
        };
        let placement = popup.placement(self.map.viewport().size);
        let marker = self.map.markers().into_iter().find(|m| m.id == listing.id);

        let favorite = self.map.is_favorite(&listing.id);
        let mut close = false;
        let mut book = false;
        let mut heart = false;
        egui::Area::new(egui::Id::new("listing_popup"))
            .fixed_pos(to_pos(rect.min, placement))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_width(240.0);
                    ui.horizontal(|ui| {
                        ui.strong(listing.display_name());
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            close = ui.small_button("✕").clicked();
                            heart = heart_button(ui, favorite).clicked();
                        });
                    });
                    ui.label(format!("★ {:.1} ({} reviews)", listing.rating, listing.review_count));
                    ui.label(&listing.location);
                    if let Some(marker) = &marker {
                        ui.label(marker.label());
                        if let Some(detail) = marker.detail() {
                            ui.label(detail);
                        }
                    }
                    if !listing.bio.is_empty() {
                        ui.small(&listing.bio);
                    }
                    if !listing.certifications.is_empty() {
                        ui.small(listing.certifications.join(" · "));
                    }
                    book = ui.button("Book").clicked();
                });
            });

        if close {
            self.map.close_popup();
        }
        if heart {
            self.map.toggle_favorite(&listing.id);
        }
        if book {
            self.booking = Some(BookingFlow::new(&listing));
        }
    }

    fn booking_window(&mut self, ctx: &egui::Context) {
        let Some(mut flow) = self.booking.take() else {
            return;
        };
        let mut keep_open = true;
        let mut outcome = None;

        egui::Window::new(flow.title())
            .id(egui::Id::new("booking"))
            .collapsible(false)
            .open(&mut keep_open)
            .show(ctx, |ui| {
                ui.label(flow.progress_label());
                ui.separator();

                match flow.step() {
                    BookingStep::Schedule => {
                        ui.horizontal(|ui| {
                            ui.radio_value(&mut flow.booking_type, BookingType::Instant, "Instant Book");
                            ui.radio_value(&mut flow.booking_type, BookingType::Request, "Request to Book");
                        });
                        ui.horizontal(|ui| {
                            ui.label("Date");
                            ui.text_edit_singleline(&mut flow.form.date);
                        });
                        ui.horizontal(|ui| {
                            ui.label("Start time");
                            ui.text_edit_singleline(&mut flow.form.start_time);
                        });
                        egui::ComboBox::from_label("Total Duration")
                            .selected_text(format!("{} hours", flow.form.duration_hours))
                            .show_ui(ui, |ui| {
                                for hours in DURATION_CHOICES {
                                    ui.selectable_value(&mut flow.form.duration_hours, hours, format!("{} hours", hours));
                                }
                            });
                        ui.add(egui::DragValue::new(&mut flow.form.children).clamp_range(1..=4).prefix("Children: "));
                    }
                    BookingStep::Details => {
                        for (label, value) in [
                            ("Address", &mut flow.form.address),
                            ("City", &mut flow.form.city),
                            ("Emergency contact", &mut flow.form.emergency_contact),
                            ("Emergency phone", &mut flow.form.emergency_phone),
                        ] {
                            ui.horizontal(|ui| {
                                ui.label(label);
                                ui.text_edit_singleline(value);
                            });
                        }
                        ui.label("Special requirements");
                        ui.text_edit_multiline(&mut flow.form.special_requirements);
                        ui.separator();
                        for service in AdditionalService::ALL {
                            let mut on = flow.form.additional_services.contains(&service);
                            let text = format!("{} (+${}/hour)", service.label(), service.listed_price());
                            if ui.checkbox(&mut on, text).changed() {
                                flow.toggle_service(service);
                            }
                        }
                    }
                    BookingStep::Payment => {
                        let quote = flow.quote();
                        egui::Grid::new("quote").show(ui, |ui| {
                            ui.label(format!(
                                "${}/hr × {} hours",
                                flow.listing().hourly_rate,
                                flow.form.duration_hours
                            ));
                            ui.label(format!("${:.2}", quote.base));
                            ui.end_row();
                            ui.label("Additional services");
                            ui.label(format!("${:.2}", quote.services));
                            ui.end_row();
                            ui.label("Platform fee");
                            ui.label(format!("${:.2}", quote.platform_fee));
                            ui.end_row();
                            ui.strong("Total");
                            ui.strong(format!("${:.2}", quote.total));
                            ui.end_row();
                        });
                    }
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button(flow.back_label()).clicked() {
                        outcome = Some(Ok(flow.back()));
                    }
                    if ui.button(flow.forward_label()).clicked() {
                        outcome = Some(flow.advance());
                    }
                });
            });

        match outcome {
            Some(Ok(FlowOutcome::Closed)) | Some(Ok(FlowOutcome::Submitted(_))) => {}
            Some(Err(e)) => {
                log::error!("booking failed: {}", e);
                self.booking = Some(flow);
            }
            _ if keep_open => self.booking = Some(flow),
            _ => {}
        }
    }
}

impl eframe::App for SitterMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_channels(ctx);

        egui::SidePanel::left("listings")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.listing_panel(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.map_area(ui));

        self.booking_window(ctx);

        // tiles and location results arrive off the UI thread
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

impl Drop for SitterMapApp {
    fn drop(&mut self) {
        self.map.teardown();
    }
}
