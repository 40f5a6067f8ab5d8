//! Canvas drawing, transient particle effects, and the DOM overlay HUD.
//!
//! Particle motion lives here as plain data so the simulation tick can advance
//! it without a canvas; everything that needs a `CanvasRenderingContext2d`
//! degrades silently when a draw call fails.

use wasm_bindgen::JsValue;
use web_sys::{window, CanvasRenderingContext2d, Document};

use super::powerups::PowerUpKind;
use super::{leaderboard, GameMode, GameState};

const BACKGROUND_PARTICLE_COUNT: usize = 50;
const EXPLOSION_PARTICLE_COUNT: usize = 15;
const WORD_FONT: &str = "24px 'Orbitron', monospace";
const MATCHED_PREFIX_COLOR: &str = "#00ff88";

/// Short-lived burst particle spawned on completions and misses.
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub color: &'static str,
    pub size: f64,
    pub vx: f64,
    pub vy: f64,
    pub life: f64,
}

impl Particle {
    const DECAY: f64 = 0.02;
    const DRAG: f64 = 0.99;

    pub fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vx *= Self::DRAG;
        self.vy *= Self::DRAG;
        self.life -= Self::DECAY;
    }
}

/// Ambient drizzle particle; drifts down and wraps at the edges.
#[derive(Clone, Debug)]
pub struct BackgroundParticle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub vx: f64,
    pub vy: f64,
    pub opacity: f64,
}

impl BackgroundParticle {
    pub fn advance(&mut self, width: f64, height: f64) {
        self.x += self.vx;
        self.y += self.vy;
        if self.y > height {
            self.y = -10.0;
        }
        if self.x > width {
            self.x = 0.0;
        } else if self.x < 0.0 {
            self.x = width;
        }
    }
}

/// Seed the ambient background drizzle for a fresh run.
pub fn init_background(state: &mut GameState) {
    state.background.clear();
    for _ in 0..BACKGROUND_PARTICLE_COUNT {
        let p = BackgroundParticle {
            x: state.rng.next_f64() * state.canvas_w,
            y: state.rng.next_f64() * state.canvas_h,
            size: state.rng.next_f64() * 2.0 + 0.5,
            vx: (state.rng.next_f64() - 0.5) * 0.5,
            vy: state.rng.next_f64() * 0.5 + 0.1,
            opacity: state.rng.next_f64() * 0.5 + 0.1,
        };
        state.background.push(p);
    }
}

/// Spawn a 15-particle burst at the given point.
pub fn create_explosion(state: &mut GameState, x: f64, y: f64, color: &'static str) {
    for _ in 0..EXPLOSION_PARTICLE_COUNT {
        let p = Particle {
            x,
            y,
            color,
            size: state.rng.next_f64() * 3.0 + 1.0,
            vx: (state.rng.next_f64() - 0.5) * 4.0,
            vy: (state.rng.next_f64() - 0.5) * 4.0,
            life: 1.0,
        };
        state.particles.push(p);
    }
}

/// Advance burst particles and drop the expired ones.
pub fn advance_particles(state: &mut GameState) {
    for p in &mut state.particles {
        p.advance();
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Advance the ambient drizzle.
pub fn advance_background(state: &mut GameState) {
    let (w, h) = (state.canvas_w, state.canvas_h);
    for p in &mut state.background {
        p.advance(w, h);
    }
}

/// Paint the whole frame.
pub fn draw(ctx: &CanvasRenderingContext2d, state: &GameState, _now: f64) {
    ctx.clear_rect(0.0, 0.0, state.canvas_w, state.canvas_h);
    draw_background(ctx, state);

    if !state.game_started {
        return;
    }

    if !state.game_running {
        draw_game_over(ctx, state);
        return;
    }

    if state.mode == GameMode::Level && !state.level_started {
        draw_level_intro(ctx, state);
        return;
    }

    if state.game_completed {
        draw_congratulations(ctx, state);
        return;
    }

    for word in &state.words {
        draw_word(ctx, word);
    }
    draw_particles(ctx, state);
}

fn draw_background(ctx: &CanvasRenderingContext2d, state: &GameState) {
    for p in &state.background {
        ctx.save();
        ctx.set_global_alpha(p.opacity);
        ctx.set_fill_style_str("#00f5ff");
        ctx.begin_path();
        ctx.arc(p.x, p.y, p.size, 0.0, std::f64::consts::TAU).ok();
        ctx.fill();
        ctx.restore();
    }
}

fn draw_particles(ctx: &CanvasRenderingContext2d, state: &GameState) {
    for p in &state.particles {
        ctx.save();
        ctx.set_global_alpha(p.life.clamp(0.0, 1.0));
        ctx.set_fill_style_str(p.color);
        ctx.begin_path();
        ctx.arc(p.x, p.y, p.size, 0.0, std::f64::consts::TAU).ok();
        ctx.fill();
        ctx.restore();
    }
}

/// One falling word: typed prefix in the match color, remainder in the word's
/// own color, centered on `word.x`.
fn draw_word(ctx: &CanvasRenderingContext2d, word: &super::words::FallingWord) {
    ctx.save();
    ctx.set_shadow_color(word.color);
    ctx.set_shadow_blur(10.0);
    ctx.set_font(WORD_FONT);
    ctx.set_text_align("left");

    let total_width = ctx
        .measure_text(word.text)
        .map(|m| m.width())
        .unwrap_or(0.0);
    let start_x = word.x - total_width / 2.0;

    let split = word.progress.min(word.text.len());
    let (prefix, rest) = word.text.split_at(split);
    if !prefix.is_empty() {
        ctx.set_fill_style_str(MATCHED_PREFIX_COLOR);
        ctx.fill_text(prefix, start_x, word.y).ok();
    }
    let offset = ctx.measure_text(prefix).map(|m| m.width()).unwrap_or(0.0);
    ctx.set_fill_style_str(word.color);
    ctx.fill_text(rest, start_x + offset, word.y).ok();
    ctx.restore();
}

fn draw_level_intro(ctx: &CanvasRenderingContext2d, state: &GameState) {
    ctx.save();
    ctx.set_fill_style_str("rgba(0,0,0,0.7)");
    ctx.fill_rect(0.0, 0.0, state.canvas_w, state.canvas_h);

    let cx = state.canvas_w / 2.0;
    let cy = state.canvas_h / 2.0;
    ctx.set_text_align("center");
    ctx.set_shadow_color("#00f5ff");
    ctx.set_shadow_blur(20.0);
    ctx.set_fill_style_str("#00f5ff");
    ctx.set_font("48px 'Orbitron', monospace");
    ctx.fill_text(&format!("LEVEL {}", state.level), cx, cy).ok();

    let desc = match state.level {
        1 => "Easy words with 10% medium words",
        2 => "Medium words with 10% hard words",
        _ => "All hard words - Final challenge!",
    };
    ctx.set_shadow_blur(0.0);
    ctx.set_fill_style_str("#ffffff");
    ctx.set_font("24px 'Orbitron', monospace");
    ctx.fill_text(desc, cx, cy + 60.0).ok();
    ctx.restore();
}

fn draw_congratulations(ctx: &CanvasRenderingContext2d, state: &GameState) {
    ctx.save();
    ctx.set_fill_style_str("rgba(0,0,0,0.8)");
    ctx.fill_rect(0.0, 0.0, state.canvas_w, state.canvas_h);

    let cx = state.canvas_w / 2.0;
    let cy = state.canvas_h / 2.0;
    ctx.set_text_align("center");

    let gradient = ctx.create_linear_gradient(0.0, 0.0, state.canvas_w, 0.0);
    gradient.add_color_stop(0.0, "#ff6b6b").ok();
    gradient.add_color_stop(0.2, "#feca57").ok();
    gradient.add_color_stop(0.4, "#48dbfb").ok();
    gradient.add_color_stop(0.6, "#ff9ff3").ok();
    gradient.add_color_stop(0.8, "#54a0ff").ok();
    gradient.add_color_stop(1.0, "#5f27cd").ok();
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.set_shadow_color("#ffffff");
    ctx.set_shadow_blur(30.0);
    ctx.set_font("64px 'Orbitron', monospace");
    ctx.fill_text("CONGRATULATIONS!", cx, cy - 50.0).ok();

    ctx.set_shadow_blur(0.0);
    ctx.set_fill_style_str("#ffffff");
    ctx.set_font("32px 'Orbitron', monospace");
    ctx.fill_text("You completed all levels!", cx, cy + 20.0).ok();
    ctx.set_font("24px 'Orbitron', monospace");
    ctx.fill_text(&format!("Final Score: {}", state.score), cx, cy + 70.0)
        .ok();
    ctx.restore();
}

fn draw_game_over(ctx: &CanvasRenderingContext2d, state: &GameState) {
    ctx.save();
    ctx.set_fill_style_str("rgba(0,0,0,0.55)");
    ctx.fill_rect(0.0, 0.0, state.canvas_w, state.canvas_h);

    let cx = state.canvas_w / 2.0;
    let cy = state.canvas_h / 2.0;
    ctx.set_text_align("center");
    ctx.set_fill_style_str("#ffffff");
    ctx.set_font("72px 'Orbitron', monospace");
    ctx.set_line_width(6.0);
    ctx.set_stroke_style_str("#000000");
    ctx.stroke_text("GAME OVER", cx, cy - 30.0).ok();
    ctx.fill_text("GAME OVER", cx, cy - 30.0).ok();

    ctx.set_font("24px 'Orbitron', monospace");
    if let Some(summary) = state.summary {
        ctx.fill_text(
            &format!(
                "Score: {}   WPM: {}   Accuracy: {}%   Missed: {}",
                summary.total_score, summary.wpm, summary.accuracy, state.missed_words
            ),
            cx,
            cy + 20.0,
        )
        .ok();
        if leaderboard::is_high_score(summary.total_score) {
            ctx.set_fill_style_str("#feca57");
            ctx.fill_text("NEW HIGH SCORE!", cx, cy + 60.0).ok();
        }
    }
    ctx.restore();
}

// ---------------------------------------------------------------------------
// HUD overlays
// ---------------------------------------------------------------------------

fn ensure_overlay(doc: &Document, id: &str, style: &str) -> Result<(), JsValue> {
    if doc.get_element_by_id(id).is_some() {
        return Ok(());
    }
    if let Some(body) = doc.body() {
        let div = doc.create_element("div")?;
        div.set_id(id);
        div.set_attribute("style", style).ok();
        body.append_child(&div)?;
    }
    Ok(())
}

/// Create the HUD overlay elements if the page does not already provide them.
pub fn ensure_hud(doc: &Document) -> Result<(), JsValue> {
    ensure_overlay(doc, "tr-stats", "position:fixed; top:10px; left:12px; font-family:'Orbitron', monospace; font-size:15px; padding:4px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#00f5ff; z-index:45; letter-spacing:0.5px;")?;
    ensure_overlay(doc, "tr-time", "position:fixed; top:10px; left:50%; transform:translateX(-50%); font-family:'Orbitron', monospace; font-size:18px; padding:4px 10px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:45;")?;
    ensure_overlay(doc, "tr-effects", "position:fixed; top:10px; right:12px; font-family:'Orbitron', monospace; font-size:14px; padding:4px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#96ceb4; z-index:45;")?;
    ensure_overlay(doc, "tr-typing", "position:fixed; bottom:60px; left:50%; transform:translateX(-50%); font-family:'Orbitron', monospace; font-size:20px; padding:4px 10px; background:rgba(0,0,0,0.35); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:30;")?;
    ensure_overlay(doc, "tr-slots", "position:fixed; bottom:12px; left:50%; transform:translateX(-50%); font-family:'Orbitron', monospace; font-size:16px; padding:4px 10px; background:rgba(0,0,0,0.35); border:1px solid #333; border-radius:6px; color:#ffffff; z-index:30;")?;
    Ok(())
}

/// Refresh the HUD overlays from the current state. Missing elements are
/// skipped; the HUD never interrupts the tick.
pub fn update_hud(state: &GameState, now: f64) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };

    if let Some(el) = doc.get_element_by_id("tr-stats") {
        let missed = if state.mode == GameMode::Practice {
            format!("{}", state.missed_words)
        } else {
            format!("{}/{}", state.missed_words, state.max_misses)
        };
        let mut line = format!(
            "Score: {}  Level: {}  Missed: {}  WPM: {}  Accuracy: {}%",
            state.score,
            state.level,
            missed,
            state.wpm(now),
            state.accuracy(),
        );
        if state.combo > 1 {
            line.push_str(&format!("  Combo: x{}", state.combo));
        }
        el.set_text_content(Some(&line));
    }

    if let Some(el) = doc.get_element_by_id("tr-time") {
        match state.end_time_ms {
            Some(end) if state.game_running => {
                let remaining = ((end - now) / 1000.0).max(0.0) as u64;
                el.set_text_content(Some(&format!("{}:{:02}", remaining / 60, remaining % 60)));
            }
            _ => el.set_text_content(Some("")),
        }
    }

    if let Some(el) = doc.get_element_by_id("tr-effects") {
        let mut text = String::new();
        let effects = &state.effects;
        if effects.slow_time {
            text.push_str(&format!("{} ", PowerUpKind::SlowTime.icon()));
        }
        for (icon, count) in [
            (PowerUpKind::PrecisionMode.icon(), effects.precision_mode),
            (PowerUpKind::DoubleScore.icon(), effects.double_score),
            (PowerUpKind::Shield.icon(), effects.shield),
            (PowerUpKind::ComboProtect.icon(), effects.combo_protect),
        ] {
            if count > 0 {
                text.push_str(&format!("{icon}x{count} "));
            }
        }
        el.set_text_content(Some(text.trim_end()));
    }

    if let Some(el) = doc.get_element_by_id("tr-typing") {
        el.set_text_content(Some(&state.typing));
    }

    if let Some(el) = doc.get_element_by_id("tr-slots") {
        let mut html = String::new();
        for (i, slot) in state.slots.iter().enumerate() {
            match slot {
                Some(kind) => html.push_str(&format!(
                    "<span title='{}' style='margin-right:10px;'>{}<sub>{}</sub></span>",
                    kind.label(),
                    kind.icon(),
                    i + 1
                )),
                None => html.push_str(&format!(
                    "<span style='margin-right:10px; opacity:0.3;'>{}<sub>{}</sub></span>",
                    PowerUpKind::ALL[i].icon(),
                    i + 1
                )),
            }
        }
        el.set_inner_html(&html);
    }
}
