//! Plotting functions exposed to scripts.
//!
//! | Function | Effect |
//! |----------|--------|
//! | `figure()` / `figure(title)` | open a new figure, make it current, return its number |
//! | `plot(ys)` / `plot(xs, ys)` | line series on the current figure |
//! | `scatter(xs, ys)` | point series |
//! | `bar(values)` / `bar(xs, values)` | column series |
//! | `title(t)`, `xlabel(t)`, `ylabel(t)` | labels on the current figure |
//! | `clf()` | remove every series from the current figure |
//! | `close()` / `close_all()` | drop the current / every figure |
//! | `show()` | no-op; images are collected when the script finishes |
//! | `figure_count()` | number of open figures |
//!
//! Drawing calls create a figure implicitly when none is open.

use rhai::{Array, Engine, EvalAltResult, INT, ImmutableString, Position};

use crate::figure::context;
use crate::figure::types::{Series, SeriesKind};

type FnResult<T> = Result<T, Box<EvalAltResult>>;

pub fn register(engine: &mut Engine) {
    engine.register_fn("figure", || -> INT { context::lock().new_figure() });
    engine.register_fn("figure", |title: ImmutableString| -> INT {
        let mut figures = context::lock();
        let number = figures.new_figure();
        figures.current_mut().title = Some(title.to_string());
        number
    });

    engine.register_fn("plot", |ys: Array| -> FnResult<()> {
        add_series(Series::indexed(SeriesKind::Line, to_numbers(&ys)?))
    });
    engine.register_fn("plot", |xs: Array, ys: Array| -> FnResult<()> {
        add_pairs(SeriesKind::Line, &xs, &ys)
    });
    engine.register_fn("scatter", |xs: Array, ys: Array| -> FnResult<()> {
        add_pairs(SeriesKind::Scatter, &xs, &ys)
    });
    engine.register_fn("bar", |values: Array| -> FnResult<()> {
        add_series(Series::indexed(SeriesKind::Bar, to_numbers(&values)?))
    });
    engine.register_fn("bar", |xs: Array, values: Array| -> FnResult<()> {
        add_pairs(SeriesKind::Bar, &xs, &values)
    });

    engine.register_fn("title", |text: ImmutableString| {
        context::lock().current_mut().title = Some(text.to_string());
    });
    engine.register_fn("xlabel", |text: ImmutableString| {
        context::lock().current_mut().xlabel = Some(text.to_string());
    });
    engine.register_fn("ylabel", |text: ImmutableString| {
        context::lock().current_mut().ylabel = Some(text.to_string());
    });

    engine.register_fn("clf", || context::lock().current_mut().series.clear());
    engine.register_fn("close", || context::lock().close_current());
    engine.register_fn("close_all", context::clear);
    engine.register_fn("show", || {});
    engine.register_fn("figure_count", || context::figure_count() as INT);
}

fn add_series(series: Series) -> FnResult<()> {
    context::lock().current_mut().series.push(series);
    Ok(())
}

fn add_pairs(kind: SeriesKind, xs: &Array, ys: &Array) -> FnResult<()> {
    let series = Series::new(kind, to_numbers(xs)?, to_numbers(ys)?)
        .map_err(|message| EvalAltResult::ErrorRuntime(message.into(), Position::NONE))?;
    add_series(series)
}

fn to_numbers(values: &Array) -> FnResult<Vec<f64>> {
    values
        .iter()
        .map(|value| {
            value
                .as_float()
                .ok()
                .or_else(|| value.as_int().ok().map(|v| v as f64))
                .ok_or_else(|| {
                    EvalAltResult::ErrorMismatchDataType(
                        "number".to_string(),
                        value.type_name().to_string(),
                        Position::NONE,
                    )
                    .into()
                })
        })
        .collect()
}
