//! Range and volume indicators: ATR and on-balance volume

/// Average true range with Wilder smoothing
///
/// Indices before `n - 1` are 0. The first value is the mean true range of
/// the first `n` candles; the first candle's true range is its high-low span.
pub fn atr(high: &[f64], low: &[f64], close: &[f64], n: usize) -> Vec<f64> {
    let len = high.len().min(low.len()).min(close.len());
    let mut out = vec![0.0; len];
    if n == 0 || len < n {
        return out;
    }

    let true_range = |i: usize| {
        let span = high[i] - low[i];
        if i == 0 {
            return span;
        }
        let prev = close[i - 1];
        span.max((high[i] - prev).abs()).max((low[i] - prev).abs())
    };

    let period = n as f64;
    let mut avg = (0..n).map(true_range).sum::<f64>() / period;
    out[n - 1] = avg;
    for (i, slot) in out.iter_mut().enumerate().skip(n) {
        avg = (avg * (period - 1.0) + true_range(i)) / period;
        *slot = avg;
    }
    out
}

/// Cumulative on-balance volume, starting at 0
///
/// Volume is added on an up close, subtracted on a down close and ignored
/// on an unchanged close.
pub fn obv(close: &[f64], volume: &[f64]) -> Vec<f64> {
    let len = close.len().min(volume.len());
    let mut out = Vec::with_capacity(len);
    let mut total = 0.0;
    for i in 0..len {
        if i > 0 {
            if close[i] > close[i - 1] {
                total += volume[i];
            } else if close[i] < close[i - 1] {
                total -= volume[i];
            }
        }
        out.push(total);
    }
    out
}
