//! Moving averages and rolling dispersion

/// Simple moving average over `n` closes
///
/// Indices before the first full window are NaN.
pub fn sma(closes: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    if n == 0 {
        return out;
    }

    let mut sum = 0.0;
    for (i, &x) in closes.iter().enumerate() {
        sum += x;
        if i >= n {
            sum -= closes[i - n];
        }
        if i + 1 >= n {
            out[i] = sum / n as f64;
        }
    }
    out
}

/// Exponential moving average with `alpha = 2 / (n + 1)`, seeded with the
/// first close
pub fn ema(closes: &[f64], n: usize) -> Vec<f64> {
    if n == 0 {
        return vec![f64::NAN; closes.len()];
    }

    let alpha = 2.0 / (n as f64 + 1.0);
    let mut out = Vec::with_capacity(closes.len());
    let mut prev: Option<f64> = None;
    for &x in closes {
        let next = match prev {
            Some(p) => alpha * x + (1.0 - alpha) * p,
            None => x,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

/// MACD line, signal line and histogram
#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD from `fast` and `slow` close EMAs, with a `signal` EMA of the line
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let fast = ema(closes, fast);
    let slow = ema(closes, slow);
    let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ema(&line, signal);
    let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    Macd {
        line,
        signal,
        histogram,
    }
}

/// Population standard deviation over a rolling window of `n` closes
///
/// Indices before the first full window are NaN.
pub fn rolling_std(closes: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    if n == 0 {
        return out;
    }

    for i in (n - 1)..closes.len() {
        let window = &closes[i + 1 - n..=i];
        let mean = window.iter().sum::<f64>() / n as f64;
        let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        out[i] = variance.sqrt();
    }
    out
}
