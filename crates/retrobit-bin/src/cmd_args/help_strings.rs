/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

pub static SCALE_HELP: &str = "Pixelation factor

The image is shrunk by this factor using nearest neighbor sampling,
so every output pixel stands for a scale x scale block.
A scale of 1 keeps the original size";

pub static COLORS_HELP: &str = "Color budget, between 4 and 256

With --quantize the palette has at most this many colors.
Without it the budget picks a posterize level count, which only
approximates it, 32 colors gives 5 levels per channel, up to 125 colors";

pub static QUANTIZE_HELP: &str = "Use median cut quantization

Builds a palette from the image itself and maps every pixel
to its closest palette color. Slower than posterization but
respects the color budget exactly";

pub static RESCALE_HELP: &str = "Scale the result back up

Multiplies the final dimensions by the pixelation factor,
keeping the blocky look at a viewable size. Has no effect
with a scale of 1";
